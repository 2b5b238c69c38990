// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Operator-logged contacts and the store they are appended to.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// A completed contact as entered by the operator. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QsoLogEntry {
    pub call_sign: String,
    pub grid: String,
    pub mode: String,
    pub report_sent: String,
    pub report_received: String,
    /// Unix epoch seconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Durable, append-only record of completed contacts.
///
/// The automation engine only ever appends; `entries` exists for the
/// operator-facing API.
pub trait QsoLogStore: Send + Sync {
    fn append(&self, entry: &QsoLogEntry) -> Result<(), StorageError>;

    /// All entries in append order.
    fn entries(&self) -> Result<Vec<QsoLogEntry>, StorageError>;
}

#[cfg(test)]
pub(crate) mod memory {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub(crate) struct MemoryLogStore {
        pub(crate) entries: Mutex<Vec<QsoLogEntry>>,
        pub(crate) fail: bool,
    }

    impl QsoLogStore for MemoryLogStore {
        fn append(&self, entry: &QsoLogEntry) -> Result<(), StorageError> {
            if self.fail {
                return Err(StorageError::Io("disk full".to_string()));
            }
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }

        fn entries(&self) -> Result<Vec<QsoLogEntry>, StorageError> {
            Ok(self.entries.lock().unwrap().clone())
        }
    }
}
