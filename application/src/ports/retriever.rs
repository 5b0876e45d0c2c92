//! Retriever port
//!
//! The vector index is an external collaborator: given one query it returns
//! candidate documents closest-first. The fusion core never ranks or scores
//! documents itself.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tutor_domain::Document;

/// Errors that can occur while retrieving documents for one query
#[derive(Error, Debug, Clone)]
pub enum RetrievalError {
    #[error("Index unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Retrieval timed out after {0:?}")]
    Timeout(Duration),
}

/// Retrieves an ordered candidate list for one query
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return at most `k` documents, most relevant first
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrievalError>;
}
