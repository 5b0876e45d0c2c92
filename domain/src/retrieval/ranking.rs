//! Ranked lists (per query) and the fused ranking (per request).

use super::document::{Document, DocumentKey};
use super::query::Query;
use serde::{Deserialize, Serialize};

/// Documents returned for one query, closest first (rank 0 = most relevant).
///
/// An empty list is valid: the query matched nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedList {
    pub query: Query,
    pub documents: Vec<Document>,
}

impl RankedList {
    pub fn new(query: impl Into<Query>, documents: Vec<Document>) -> Self {
        Self {
            query: query.into(),
            documents,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// `(rank, document)` pairs in rank order.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &Document)> {
        self.documents.iter().enumerate()
    }
}

/// A document with its accumulated fusion score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
    /// Number of ranked lists that contributed to `score`.
    pub hits: usize,
}

/// Fused ranking: score descending, ties in first-seen order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FusedRanking {
    entries: Vec<ScoredDocument>,
}

impl FusedRanking {
    /// Wrap entries that are already in fused order.
    pub(crate) fn from_sorted(entries: Vec<ScoredDocument>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ScoredDocument] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredDocument> {
        self.entries.iter()
    }

    /// The first `k` entries (fewer if the ranking is shorter).
    pub fn top(&self, k: usize) -> &[ScoredDocument] {
        &self.entries[..k.min(self.entries.len())]
    }

    /// Score of the document with this key, if it was ranked.
    pub fn score_of(&self, key: &DocumentKey) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.document.key() == key)
            .map(|e| e.score)
    }

    /// Position of the document with this key in fused order.
    pub fn position_of(&self, key: &DocumentKey) -> Option<usize> {
        self.entries.iter().position(|e| e.document.key() == key)
    }
}
