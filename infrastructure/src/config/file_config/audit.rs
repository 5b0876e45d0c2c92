//! Audit and topic log configuration from TOML (`[audit]`, `[topics]`, `[logging]`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Audit record layout on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditFormat {
    /// One JSON object per line, appended
    #[default]
    Jsonl,
    /// Human-readable log of the latest run, overwritten per request
    Text,
}

/// Raw audit configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    pub enabled: bool,
    /// Output file; defaults to the data directory
    pub path: Option<PathBuf>,
    pub format: AuditFormat,
}

impl Default for FileAuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            format: AuditFormat::Jsonl,
        }
    }
}

/// Raw unsupported-topic log configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTopicsConfig {
    /// File collecting unsupported questions; disabled when unset
    pub unsupported_log: Option<PathBuf>,
}

/// Raw diagnostic logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rotated log files; stderr only when unset
    pub dir: Option<PathBuf>,
}
