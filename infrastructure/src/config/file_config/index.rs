//! Snippet index configuration from TOML (`[index]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which retriever ranks the snippet index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrieverKind {
    /// BM25 over snippet bodies, fully offline
    #[default]
    Lexical,
    /// Cosine similarity over stored embeddings
    Embedding,
}

impl std::fmt::Display for RetrieverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrieverKind::Lexical => write!(f, "lexical"),
            RetrieverKind::Embedding => write!(f, "embedding"),
        }
    }
}

/// Raw index configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIndexConfig {
    /// JSONL file of snippets
    pub path: PathBuf,
    pub retriever: RetrieverKind,
    /// Embedding model name (embedding retriever only)
    pub embedding_model: String,
    /// Embeddings endpoint base URL; falls back to `[llm] base_url`
    pub embedding_base_url: Option<String>,
}

impl Default for FileIndexConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("snippets.jsonl"),
            retriever: RetrieverKind::Lexical,
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_base_url: None,
        }
    }
}
