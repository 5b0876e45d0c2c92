//! Snippet index and retriever adapters.
//!
//! The index is a JSONL file, one snippet per line:
//!
//! ```json
//! {"body": "for i in range(5):\n    print(i)", "metadata": {"course": "python"}, "embedding": [0.12, -0.4]}
//! ```
//!
//! Two [`Retriever`](tutor_application::Retriever) implementations rank it:
//! [`LexicalRetriever`] (BM25, offline) and [`EmbeddingRetriever`] (cosine
//! similarity against an OpenAI-compatible embeddings endpoint).

mod embedding;
mod lexical;
mod snippet;

pub use embedding::{EmbeddingRetriever, OpenAiEmbedder, QueryEmbedder};
pub use lexical::LexicalRetriever;
pub use snippet::{IndexedSnippet, SnippetIndex};

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or querying the snippet index
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Could not read index {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snippet on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Snippet on line {0} has an empty body")]
    EmptyBody(usize),

    #[error("Index has no embeddings; rebuild it or use the lexical retriever")]
    MissingEmbeddings,

    #[error("Embedding request failed: {0}")]
    Embedding(String),
}
