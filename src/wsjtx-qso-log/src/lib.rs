// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Append-only QSO log kept as a JSON-Lines file.
//!
//! Provides [`QsoLogConfig`] for TOML configuration and [`FileQsoLogStore`],
//! the file-backed [`QsoLogStore`].

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use wsjtx_core::{QsoLogEntry, QsoLogStore, StorageError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn default_qso_log_dir() -> String {
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir
            .join("wsjtx-bridge")
            .to_string_lossy()
            .to_string();
    }
    "logs".to_string()
}

/// QSO log location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QsoLogConfig {
    /// Directory holding the log file
    pub dir: String,
    /// Log file name inside `dir`
    pub file: String,
}

impl Default for QsoLogConfig {
    fn default() -> Self {
        Self {
            dir: default_qso_log_dir(),
            file: "qso-log.jsonl".to_string(),
        }
    }
}

impl QsoLogConfig {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(self.dir.trim()).join(self.file.trim())
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// One JSON object per line, in append order.
pub struct FileQsoLogStore {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileQsoLogStore {
    pub fn open(cfg: &QsoLogConfig) -> Result<Self, StorageError> {
        Self::open_path(&cfg.path())
    }

    pub fn open_path(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent).map_err(|e| {
                StorageError::Io(format!("create log dir '{}': {}", parent.display(), e))
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| StorageError::Io(format!("open '{}': {}", path.display(), e)))?;
        info!("QSO log: {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    fn io_error(&self, e: std::io::Error) -> StorageError {
        StorageError::Io(format!("'{}': {}", self.path.display(), e))
    }
}

impl QsoLogStore for FileQsoLogStore {
    fn append(&self, entry: &QsoLogEntry) -> Result<(), StorageError> {
        let mut line =
            serde_json::to_vec(entry).map_err(|e| StorageError::Serialize(e.to_string()))?;
        line.push(b'\n');

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Io("QSO log mutex poisoned".to_string()))?;
        writer.write_all(&line).map_err(|e| self.io_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))?;
        debug!("logged QSO with {}", entry.call_sign);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<QsoLogEntry>, StorageError> {
        // Hold the writer lock so a concurrent append cannot leave half a line.
        let _writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Io("QSO log mutex poisoned".to_string()))?;
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| StorageError::Corrupt {
                line: index + 1,
                message: e.to_string(),
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(call: &str, notes: Option<&str>) -> QsoLogEntry {
        QsoLogEntry {
            call_sign: call.to_string(),
            grid: "FN42".to_string(),
            mode: "FT8".to_string(),
            report_sent: "+05".to_string(),
            report_received: "-10".to_string(),
            timestamp: 1_700_000_000,
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn default_config_uses_jsonl_file() {
        let cfg = QsoLogConfig::default();
        assert_eq!(cfg.file, "qso-log.jsonl");
        assert!(cfg.path().ends_with("qso-log.jsonl"));
    }

    #[test]
    fn appends_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = QsoLogConfig {
            dir: dir.path().join("nested").to_string_lossy().to_string(),
            file: "log.jsonl".to_string(),
        };
        let store = FileQsoLogStore::open(&cfg).unwrap();
        store.append(&entry("K1ABC", None)).unwrap();
        store.append(&entry("N0XYZ", Some("portable"))).unwrap();

        let raw = std::fs::read_to_string(cfg.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert_eq!(
            store.entries().unwrap(),
            vec![entry("K1ABC", None), entry("N0XYZ", Some("portable"))]
        );
    }

    #[test]
    fn reopening_keeps_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        FileQsoLogStore::open_path(&path)
            .unwrap()
            .append(&entry("K1ABC", None))
            .unwrap();

        let store = FileQsoLogStore::open_path(&path).unwrap();
        store.append(&entry("N0XYZ", None)).unwrap();
        let calls: Vec<String> = store
            .entries()
            .unwrap()
            .into_iter()
            .map(|e| e.call_sign)
            .collect();
        assert_eq!(calls, vec!["K1ABC", "N0XYZ"]);
    }

    #[test]
    fn corrupt_line_is_reported_with_its_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let store = FileQsoLogStore::open_path(&path).unwrap();
        store.append(&entry("K1ABC", None)).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap()
            .write_all(b"\n{not json\n")
            .unwrap();

        match store.entries() {
            Err(StorageError::Corrupt { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unwritable_location_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();
        assert!(matches!(
            FileQsoLogStore::open_path(&blocker.join("log.jsonl")),
            Err(StorageError::Io(_))
        ));
    }
}
