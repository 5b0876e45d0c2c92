//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod audit;
mod fusion;
mod index;
mod llm;
mod output;

pub use audit::{AuditFormat, FileAuditConfig, FileLoggingConfig, FileTopicsConfig};
pub use fusion::FileFusionConfig;
pub use index::{FileIndexConfig, RetrieverKind};
pub use llm::FileLlmConfig;
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tutor_application::FusionParams;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("fusion.{0} must be at least 1")]
    ZeroCount(&'static str),

    #[error("fusion.rrf_k must be a positive number, got {0}")]
    InvalidDamping(f64),

    #[error("llm.model cannot be empty")]
    EmptyModelName,

    #[error("llm.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("llm.timeout_seconds cannot be 0")]
    InvalidTimeout,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Fusion tuning
    pub fusion: FileFusionConfig,
    /// Generative backend
    pub llm: FileLlmConfig,
    /// Snippet index and retriever selection
    pub index: FileIndexConfig,
    /// Per-request audit records
    pub audit: FileAuditConfig,
    /// Unsupported-topic log
    pub topics: FileTopicsConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic log files
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let fusion = &self.fusion;
        for (name, value) in [
            ("query_count", fusion.query_count),
            ("fanout_width", fusion.fanout_width),
            ("top_k", fusion.top_k),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroCount(name));
            }
        }

        if !fusion.rrf_k.is_finite() || fusion.rrf_k <= 0.0 {
            return Err(ConfigValidationError::InvalidDamping(fusion.rrf_k));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.llm.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        Ok(())
    }

    /// Fusion parameters for the orchestrator
    pub fn fusion_params(&self) -> FusionParams {
        self.fusion.to_params()
    }
}
