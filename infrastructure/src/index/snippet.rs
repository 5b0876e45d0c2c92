//! JSONL snippet index loading.

use super::IndexError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};
use tutor_domain::Document;

#[derive(Deserialize)]
struct SnippetLine {
    body: String,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

/// One snippet with its optional stored embedding.
#[derive(Debug, Clone)]
pub struct IndexedSnippet {
    pub document: Document,
    pub embedding: Option<Vec<f32>>,
}

/// In-memory snippet collection, in file order.
#[derive(Debug, Clone, Default)]
pub struct SnippetIndex {
    snippets: Vec<IndexedSnippet>,
}

impl SnippetIndex {
    /// Load a JSONL snippet file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::parse(&raw)?;
        info!("Loaded {} snippets from {}", index.len(), path.display());
        Ok(index)
    }

    /// Parse JSONL text. Blank lines are skipped; line numbers are 1-based.
    pub fn parse(raw: &str) -> Result<Self, IndexError> {
        let mut snippets = Vec::new();
        for (i, line) in raw.lines().enumerate() {
            let line_no = i + 1;
            if line.trim().is_empty() {
                continue;
            }
            let parsed: SnippetLine = serde_json::from_str(line)
                .map_err(|source| IndexError::Parse { line: line_no, source })?;
            if parsed.body.trim().is_empty() {
                return Err(IndexError::EmptyBody(line_no));
            }

            let metadata = parsed
                .metadata
                .into_iter()
                .map(|(k, v)| match v {
                    serde_json::Value::String(s) => (k, s),
                    other => (k, other.to_string()),
                })
                .collect();

            snippets.push(IndexedSnippet {
                document: Document::with_metadata(parsed.body, metadata),
                embedding: parsed.embedding.filter(|e| !e.is_empty()),
            });
        }
        debug!("Parsed {} snippets", snippets.len());
        Ok(Self { snippets })
    }

    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            snippets: documents
                .into_iter()
                .map(|document| IndexedSnippet {
                    document,
                    embedding: None,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn snippets(&self) -> &[IndexedSnippet] {
        &self.snippets
    }

    /// True when every snippet carries an embedding.
    pub fn has_embeddings(&self) -> bool {
        !self.snippets.is_empty() && self.snippets.iter().all(|s| s.embedding.is_some())
    }
}
