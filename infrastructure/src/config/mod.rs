//! Configuration file loading for rag-tutor
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TUTOR_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./tutor.toml` or `./.tutor.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/rag-tutor/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    AuditFormat, ConfigValidationError, FileAuditConfig, FileConfig, FileFusionConfig,
    FileIndexConfig, FileLlmConfig, FileLoggingConfig, FileOutputConfig,
    FileTopicsConfig, RetrieverKind,
};
pub use loader::ConfigLoader;
