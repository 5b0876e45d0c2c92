//! Domain layer for rag-tutor
//!
//! This crate contains the retrieval fusion core: entities, value objects and
//! the pure algorithms. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Retrieval Fusion
//!
//! One learner [`Question`] becomes several diversified [`Query`] values.
//! Each query retrieves a [`RankedList`] of [`Document`]s, and the lists are
//! merged with Reciprocal Rank Fusion ([`RrfFusion`]) into a [`FusedRanking`].
//! The top-K bodies of that ranking form the context window handed to the
//! answer model.
//!
//! ## Document identity
//!
//! Documents are deduplicated by [`DocumentKey`], a SHA-256 digest of the
//! body and sorted metadata, so the same snippet retrieved under different
//! queries accumulates one score.

pub mod audit;
pub mod config;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod retrieval;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use audit::AuditRecord;
pub use config::OutputFormat;
pub use core::{error::DomainError, question::Question};
pub use orchestration::{
    phase::FusionPhase,
    value_objects::{FusionOutcome, FusionResult, RetrievalFailureNote},
};
pub use prompt::{INSUFFICIENT_INFO_REPLY, PromptTemplate, UNSUPPORTED_TOPIC_REPLY};
pub use retrieval::{
    context::{CONTEXT_DELIMITER, DEFAULT_TOP_K, assemble_context},
    document::{Document, DocumentKey},
    fusion::{DEFAULT_RRF_K, RrfFusion},
    query::{Query, parse_query_lines},
    ranking::{FusedRanking, RankedList, ScoredDocument},
};
pub use session::stream::StreamEvent;
