// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod automation;
pub mod bridge;
pub mod client;
pub mod error;
pub mod ptt;
pub mod qso;
pub mod transport;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use automation::{AutomationEngine, ExchangeStep, QsoAutomationState, Station};
pub use bridge::{Bridge, TransmitOutcome};
pub use client::WsjtxClient;
pub use error::{BridgeError, StorageError, TransportError};
pub use ptt::PttController;
pub use qso::{QsoLogEntry, QsoLogStore};
pub use transport::{SendFuture, Transport};
