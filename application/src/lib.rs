//! Application layer for rag-tutor
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_FANOUT_WIDTH, DEFAULT_QUERY_COUNT, FusionParams};
pub use ports::{
    audit_sink::{AuditSink, NoAuditSink},
    llm_gateway::{GatewayError, LlmGateway, StreamHandle},
    progress::{NoProgress, ProgressNotifier},
    retriever::{RetrievalError, Retriever},
    topic_log::{NoTopicLog, TopicLog},
};
pub use use_cases::answer_question::{
    AnswerOutput, AnswerQuestionError, AnswerQuestionInput, AnswerQuestionUseCase,
};
pub use use_cases::generate_queries::{GenerateQueriesUseCase, GenerationError};
pub use use_cases::run_fusion::{RunFusionError, RunFusionUseCase};
