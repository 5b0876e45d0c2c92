//! Append-only log of questions the tutor declined.

use super::ensure_parent;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use tutor_application::TopicLog;
use tutor_domain::Question;

/// Appends each unsupported question, normalized, on its own line.
pub struct FileTopicLog {
    path: PathBuf,
    // Serializes appends from concurrent requests
    lock: Mutex<()>,
}

impl FileTopicLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TopicLog for FileTopicLog {
    fn record_unsupported(&self, question: &Question) {
        let Ok(_guard) = self.lock.lock() else {
            return;
        };
        if !ensure_parent(&self.path, "topic log") {
            return;
        }

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", question.normalized()));

        if let Err(e) = result {
            warn!("Could not append to topic log {}: {}", self.path.display(), e);
        }
    }
}
