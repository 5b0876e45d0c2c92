//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use tutor_domain::OutputFormat;

/// `[output]` table: rendering mode and terminal colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Unset means the command line or the built-in default decides.
    pub format: Option<OutputFormat>,
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Pick the output format: command line first, then this file, then the default.
    pub fn resolve_format(&self, cli: Option<OutputFormat>) -> OutputFormat {
        cli.or(self.format).unwrap_or_default()
    }
}
