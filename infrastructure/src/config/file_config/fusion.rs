//! Fusion configuration from TOML (`[fusion]` section)
//!
//! ```toml
//! [fusion]
//! query_count = 4
//! fanout_width = 5
//! top_k = 30
//! rrf_k = 5.0
//! retrieval_timeout_seconds = 30
//! generation_timeout_seconds = 60
//! include_hyde = false
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tutor_application::FusionParams;

/// Raw fusion configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFusionConfig {
    /// Diversified queries requested per question
    pub query_count: usize,
    /// Documents requested from the retriever per query
    pub fanout_width: usize,
    /// Documents kept in the assembled context
    pub top_k: usize,
    /// RRF damping constant
    pub rrf_k: f64,
    /// Per-query retrieval timeout (0 disables)
    pub retrieval_timeout_seconds: u64,
    /// Timeout for query and HyDE generation (0 disables)
    pub generation_timeout_seconds: u64,
    /// Add a hypothetical answer document as an extra query
    pub include_hyde: bool,
}

impl Default for FileFusionConfig {
    fn default() -> Self {
        let params = FusionParams::default();
        Self {
            query_count: params.query_count,
            fanout_width: params.fanout_width,
            top_k: params.top_k,
            rrf_k: params.rrf_k,
            retrieval_timeout_seconds: seconds(params.retrieval_timeout),
            generation_timeout_seconds: seconds(params.generation_timeout),
            include_hyde: params.include_hyde,
        }
    }
}

fn seconds(timeout: Option<Duration>) -> u64 {
    timeout.map(|d| d.as_secs()).unwrap_or(0)
}

fn timeout(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

impl FileFusionConfig {
    /// Convert to application-layer [`FusionParams`].
    pub fn to_params(&self) -> FusionParams {
        FusionParams::default()
            .with_query_count(self.query_count)
            .with_fanout_width(self.fanout_width)
            .with_top_k(self.top_k)
            .with_rrf_k(self.rrf_k)
            .with_retrieval_timeout(timeout(self.retrieval_timeout_seconds))
            .with_generation_timeout(timeout(self.generation_timeout_seconds))
            .with_hyde(self.include_hyde)
    }
}
