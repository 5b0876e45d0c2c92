//! Reciprocal Rank Fusion.
//!
//! Every document at zero-indexed rank `r` in a ranked list contributes
//! `1 / (r + k)` to its score, where `k` is the damping constant. Documents
//! are identified by [`DocumentKey`], so the same snippet retrieved under
//! different queries accumulates a single score.
//!
//! Ordering is score descending. Ties keep the order in which documents were
//! first encountered while walking the input lists front to back, so the
//! result depends only on the input order and never on hashing.

use super::document::DocumentKey;
use super::ranking::{FusedRanking, RankedList, ScoredDocument};
use crate::core::error::DomainError;
use std::collections::HashMap;

/// Default damping constant.
pub const DEFAULT_RRF_K: f64 = 5.0;

/// Reciprocal Rank Fusion ranker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrfFusion {
    k: f64,
}

impl Default for RrfFusion {
    fn default() -> Self {
        Self { k: DEFAULT_RRF_K }
    }
}

impl RrfFusion {
    /// Create a ranker with damping constant `k`.
    ///
    /// `k` must be finite and strictly positive, otherwise rank 0 would
    /// divide by zero or produce negative contributions.
    pub fn new(k: f64) -> Result<Self, DomainError> {
        if !k.is_finite() || k <= 0.0 {
            return Err(DomainError::InvalidParameter(format!(
                "rrf damping constant must be positive, got {}",
                k
            )));
        }
        Ok(Self { k })
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    /// Contribution of a single occurrence at `rank`.
    pub fn contribution(&self, rank: usize) -> f64 {
        1.0 / (rank as f64 + self.k)
    }

    /// Fuse ranked lists into one ranking.
    ///
    /// An empty input (every query failed) yields an empty ranking.
    pub fn fuse(&self, ranked_lists: &[RankedList]) -> FusedRanking {
        let mut entries: Vec<ScoredDocument> = Vec::new();
        let mut index: HashMap<&DocumentKey, usize> = HashMap::new();

        for list in ranked_lists {
            for (rank, doc) in list.ranked() {
                let contribution = self.contribution(rank);
                match index.get(doc.key()) {
                    Some(&i) => {
                        entries[i].score += contribution;
                        entries[i].hits += 1;
                    }
                    None => {
                        index.insert(doc.key(), entries.len());
                        entries.push(ScoredDocument {
                            document: doc.clone(),
                            score: contribution,
                            hits: 1,
                        });
                    }
                }
            }
        }

        // Stable sort: equal scores stay in first-seen order.
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        FusedRanking::from_sorted(entries)
    }
}
