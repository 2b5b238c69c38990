// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

/// Failure to move a datagram to or from the upstream application.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("failed to bind UDP socket at {addr}: {message}")]
    Bind { addr: String, message: String },

    #[error("cannot reach {addr}: {message}")]
    Connect { addr: String, message: String },

    #[error("timed out connecting to {addr}")]
    Timeout { addr: String },

    #[error("send to {addr} failed: {message}")]
    Send { addr: String, message: String },

    #[error("receive failed: {0}")]
    Receive(String),
}

/// Failure reported by a QSO log store.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("QSO log I/O error: {0}")]
    Io(String),

    #[error("QSO log serialization error: {0}")]
    Serialize(String),

    #[error("QSO log corrupt at line {line}: {message}")]
    Corrupt { line: usize, message: String },
}

/// Errors surfaced by the bridge facade.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{0}")]
    InvalidInput(String),
}
