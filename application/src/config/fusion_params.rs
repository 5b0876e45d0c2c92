//! Fusion parameters - tuning for one fusion orchestrator.
//!
//! [`FusionParams`] groups the constants that shape a fusion run. It is
//! passed into [`RunFusionUseCase`](crate::use_cases::run_fusion::RunFusionUseCase)
//! at construction so several orchestrators with different tuning can
//! coexist in one process.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tutor_domain::{DEFAULT_RRF_K, DEFAULT_TOP_K, DomainError, RrfFusion};

/// Default number of diversified queries.
pub const DEFAULT_QUERY_COUNT: usize = 4;

/// Default number of documents requested from the retriever per query.
pub const DEFAULT_FANOUT_WIDTH: usize = 5;

/// Fusion run control parameters.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `query_count` | diversified queries requested from the backend (N) |
/// | `fanout_width` | documents requested per query from the retriever |
/// | `top_k` | documents kept in the assembled context |
/// | `rrf_k` | RRF damping constant, independent of `fanout_width` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionParams {
    pub query_count: usize,
    pub fanout_width: usize,
    pub top_k: usize,
    pub rrf_k: f64,
    /// Timeout for each retriever call.
    pub retrieval_timeout: Option<Duration>,
    /// Timeout for each generation call made during fusion (queries, HyDE).
    pub generation_timeout: Option<Duration>,
    /// Append a hypothetical answer document as one extra query.
    pub include_hyde: bool,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            query_count: DEFAULT_QUERY_COUNT,
            fanout_width: DEFAULT_FANOUT_WIDTH,
            top_k: DEFAULT_TOP_K,
            rrf_k: DEFAULT_RRF_K,
            retrieval_timeout: Some(Duration::from_secs(30)),
            generation_timeout: Some(Duration::from_secs(60)),
            include_hyde: false,
        }
    }
}

impl FusionParams {
    // ==================== Builder Methods ====================

    pub fn with_query_count(mut self, count: usize) -> Self {
        self.query_count = count;
        self
    }

    pub fn with_fanout_width(mut self, width: usize) -> Self {
        self.fanout_width = width;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_rrf_k(mut self, k: f64) -> Self {
        self.rrf_k = k;
        self
    }

    pub fn with_retrieval_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.retrieval_timeout = timeout;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_hyde(mut self, enabled: bool) -> Self {
        self.include_hyde = enabled;
        self
    }

    // ==================== Validation ====================

    /// Check the parameters and build the ranker they describe.
    pub fn fusion(&self) -> Result<RrfFusion, DomainError> {
        if self.query_count == 0 {
            return Err(DomainError::InvalidParameter(
                "query_count must be at least 1".to_string(),
            ));
        }
        if self.fanout_width == 0 {
            return Err(DomainError::InvalidParameter(
                "fanout_width must be at least 1".to_string(),
            ));
        }
        RrfFusion::new(self.rrf_k)
    }
}
