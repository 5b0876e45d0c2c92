//! Audit record produced at the end of every fusion run.

use crate::core::question::Question;
use crate::orchestration::value_objects::{FusionOutcome, RetrievalFailureNote};
use crate::retrieval::query::Query;
use serde::{Deserialize, Serialize};

/// Write-once record of one fusion run, handed to an audit sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub question: Question,
    pub queries: Vec<Query>,
    pub context: String,
    #[serde(default)]
    pub failures: Vec<RetrievalFailureNote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_error: Option<String>,
    pub outcome: FusionOutcome,
}

impl AuditRecord {
    /// Record for a run that ended in total failure.
    pub fn failed(
        question: Question,
        queries: Vec<Query>,
        failures: Vec<RetrievalFailureNote>,
        generation_error: Option<String>,
    ) -> Self {
        Self {
            question,
            queries,
            context: String::new(),
            failures,
            generation_error,
            outcome: FusionOutcome::Failed,
        }
    }
}
