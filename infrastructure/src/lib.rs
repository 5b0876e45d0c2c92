//! Infrastructure layer for rag-tutor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod index;
pub mod llm;
pub mod logging;

// Re-export commonly used types
pub use config::{
    AuditFormat, ConfigLoader, ConfigValidationError, FileConfig, FileFusionConfig,
    FileIndexConfig, FileLlmConfig, FileOutputConfig, RetrieverKind,
};
pub use index::{
    EmbeddingRetriever, IndexError, LexicalRetriever, OpenAiEmbedder, QueryEmbedder, SnippetIndex,
};
pub use llm::{OpenAiCompatGateway, SamplingParams};
pub use logging::{FileTopicLog, JsonlAuditSink, TextAuditSink};
