//! How a tutor run is rendered on stdout

use serde::{Deserialize, Serialize};

/// Rendering mode for a tutor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Queries, retrieval diagnostics, ranking and the answer
    Full,
    /// Only the answer text
    #[default]
    Answer,
    /// Machine-readable run summary
    Json,
}

impl OutputFormat {
    /// Whether progress may be drawn on stderr alongside this format.
    ///
    /// JSON consumers usually capture both streams, so they get none.
    pub fn allows_progress(self) -> bool {
        !matches!(self, Self::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_only_unless_configured() {
        assert_eq!(OutputFormat::default(), OutputFormat::Answer);
    }

    #[test]
    fn test_values_are_lowercase() {
        let parsed: OutputFormat = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(parsed, OutputFormat::Full);
        assert_eq!(serde_json::to_string(&OutputFormat::Json).unwrap(), "\"json\"");
    }

    #[test]
    fn test_json_suppresses_progress() {
        assert!(!OutputFormat::Json.allows_progress());
        assert!(OutputFormat::Full.allows_progress());
    }
}
