//! Orchestration value objects - immutable result types for fusion runs.
//!
//! - [`RetrievalFailureNote`] - a query whose retrieval failed and was dropped
//! - [`FusionOutcome`] - how the run terminated
//! - [`FusionResult`] - everything the caller gets back from one run

use crate::audit::AuditRecord;
use crate::core::question::Question;
use crate::retrieval::query::Query;
use crate::retrieval::ranking::FusedRanking;
use serde::{Deserialize, Serialize};

/// A query whose retrieval failed; its list was omitted from fusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalFailureNote {
    pub query: Query,
    pub error: String,
}

impl RetrievalFailureNote {
    pub fn new(query: Query, error: impl Into<String>) -> Self {
        Self {
            query,
            error: error.into(),
        }
    }
}

/// Terminal state of a fusion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionOutcome {
    /// Diversification succeeded
    Success,
    /// Diversification failed; the question alone was used as the query
    Degraded,
    /// Diversification and the fallback retrieval both failed.
    ///
    /// Only appears in audit records; callers receive an error instead.
    Failed,
}

impl FusionOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            FusionOutcome::Success => "success",
            FusionOutcome::Degraded => "degraded",
            FusionOutcome::Failed => "failed",
        }
    }
}

impl std::fmt::Display for FusionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one fusion run (Success or Degraded)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionResult {
    pub question: Question,
    /// Queries actually sent to the retriever, in order
    pub queries: Vec<Query>,
    pub ranking: FusedRanking,
    pub context: String,
    /// Per-query retrieval failures (omitted from fusion)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RetrievalFailureNote>,
    /// Why diversification failed, when the run is degraded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_error: Option<String>,
    pub outcome: FusionOutcome,
}

impl FusionResult {
    pub fn is_degraded(&self) -> bool {
        self.outcome == FusionOutcome::Degraded
    }

    /// True when nothing was retrieved; callers decide how to respond.
    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }

    /// Number of queries whose retrieval succeeded.
    pub fn succeeded_queries(&self) -> usize {
        self.queries.len().saturating_sub(self.failures.len())
    }

    /// Build the write-once audit record for this run.
    pub fn audit_record(&self) -> AuditRecord {
        AuditRecord {
            question: self.question.clone(),
            queries: self.queries.clone(),
            context: self.context.clone(),
            failures: self.failures.clone(),
            generation_error: self.generation_error.clone(),
            outcome: self.outcome,
        }
    }
}
