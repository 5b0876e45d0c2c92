//! JSONL file writer for fusion audit records.
//!
//! Each [`AuditRecord`] is serialized as a single JSON line with a `type`
//! field and `timestamp`, appended to the file via a buffered writer.

use super::ensure_parent;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use tutor_application::AuditSink;
use tutor_domain::AuditRecord;

const RECORD_TYPE: &str = "fusion_run";

/// JSONL audit sink that appends one JSON object per run.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlAuditSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditSink {
    /// Open (or create) the audit file for appending.
    ///
    /// Creates parent directories if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if !ensure_parent(path, "audit log") {
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditSink {
    fn record(&self, record: &AuditRecord) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut value = match serde_json::to_value(record) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not serialize audit record: {}", e);
                return;
            }
        };
        if let serde_json::Value::Object(map) = &mut value {
            map.insert("type".to_string(), RECORD_TYPE.into());
            map.insert("timestamp".to_string(), timestamp.into());
        }

        let Ok(line) = serde_json::to_string(&value) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line) {
                warn!("Could not write audit record to {}: {}", self.path.display(), e);
                return;
            }
            // Append-only; flush each record so a crash loses at most one
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlAuditSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
