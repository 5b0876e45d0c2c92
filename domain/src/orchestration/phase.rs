//! Phases of a fusion run

use serde::{Deserialize, Serialize};

/// Phase of a fusion run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionPhase {
    /// Diversify the question into several queries
    Diversify,
    /// Retrieve one ranked list per query
    Retrieve,
    /// Reciprocal Rank Fusion over the ranked lists
    Fuse,
    /// Build the bounded context window
    Assemble,
}

impl FusionPhase {
    pub fn as_str(&self) -> &str {
        match self {
            FusionPhase::Diversify => "diversify",
            FusionPhase::Retrieve => "retrieve",
            FusionPhase::Fuse => "fuse",
            FusionPhase::Assemble => "assemble",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            FusionPhase::Diversify => "Query Diversification",
            FusionPhase::Retrieve => "Retrieval",
            FusionPhase::Fuse => "Rank Fusion",
            FusionPhase::Assemble => "Context Assembly",
        }
    }
}

impl std::fmt::Display for FusionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
