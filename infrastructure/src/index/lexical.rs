//! BM25 retriever over snippet bodies.

use super::SnippetIndex;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tutor_application::{RetrievalError, Retriever};
use tutor_domain::Document;

/// BM25 scorer parameters
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    /// Term frequency saturation
    pub k1: f64,
    /// Length normalization
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

/// Lowercased alphanumeric terms; `_` counts as a word character.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

struct TermStats {
    frequencies: HashMap<String, usize>,
    length: usize,
}

/// Ranks snippets against a query with Okapi BM25.
///
/// Term statistics are computed once at construction. Snippets that share no
/// term with the query are never returned; ties keep index order.
pub struct LexicalRetriever {
    index: Arc<SnippetIndex>,
    stats: Vec<TermStats>,
    document_frequency: HashMap<String, usize>,
    average_length: f64,
    params: Bm25Params,
}

impl LexicalRetriever {
    pub fn new(index: Arc<SnippetIndex>) -> Self {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let stats: Vec<TermStats> = index
            .snippets()
            .iter()
            .map(|snippet| {
                let terms = tokenize(snippet.document.body());
                let mut frequencies: HashMap<String, usize> = HashMap::new();
                for term in &terms {
                    *frequencies.entry(term.clone()).or_default() += 1;
                }
                for term in frequencies.keys() {
                    *document_frequency.entry(term.clone()).or_default() += 1;
                }
                TermStats {
                    frequencies,
                    length: terms.len(),
                }
            })
            .collect();

        let total: usize = stats.iter().map(|s| s.length).sum();
        let average_length = if stats.is_empty() {
            0.0
        } else {
            total as f64 / stats.len() as f64
        };

        Self {
            index,
            stats,
            document_frequency,
            average_length,
            params: Bm25Params::default(),
        }
    }

    pub fn with_params(mut self, params: Bm25Params) -> Self {
        self.params = params;
        self
    }

    fn idf(&self, term: &str) -> f64 {
        let n = self.stats.len() as f64;
        let df = self.document_frequency.get(term).copied().unwrap_or(0) as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    fn score(&self, stats: &TermStats, terms: &[String]) -> f64 {
        let Bm25Params { k1, b } = self.params;
        let length_ratio = if self.average_length > 0.0 {
            stats.length as f64 / self.average_length
        } else {
            0.0
        };
        terms
            .iter()
            .filter_map(|term| {
                let tf = *stats.frequencies.get(term)? as f64;
                let numerator = tf * (k1 + 1.0);
                let denominator = tf + k1 * (1.0 - b + b * length_ratio);
                Some(self.idf(term) * numerator / denominator)
            })
            .sum()
    }

    /// Rank the whole index, best first, keeping at most `k`.
    pub fn rank(&self, query: &str, k: usize) -> Vec<Document> {
        let mut terms = tokenize(query);
        terms.sort();
        terms.dedup();

        let mut scored: Vec<(usize, f64)> = self
            .stats
            .iter()
            .enumerate()
            .map(|(i, stats)| (i, self.score(stats, &terms)))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored
            .into_iter()
            .take(k)
            .map(|(i, _)| self.index.snippets()[i].document.clone())
            .collect()
    }
}

#[async_trait]
impl Retriever for LexicalRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrievalError> {
        if self.index.is_empty() {
            return Err(RetrievalError::Unavailable("snippet index is empty".to_string()));
        }
        Ok(self.rank(query, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retriever(bodies: &[&str]) -> LexicalRetriever {
        let index = SnippetIndex::from_documents(bodies.iter().map(|b| Document::new(*b)));
        LexicalRetriever::new(Arc::new(index))
    }

    fn bodies(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(Document::body).collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("for_each(x) in Python's LIST"),
            vec!["for_each", "x", "in", "python", "s", "list"]
        );
    }

    #[tokio::test]
    async fn test_ranks_matching_snippets_first() {
        let r = retriever(&[
            "Dictionaries map keys to values.",
            "A for loop iterates over a sequence. The for loop is common.",
            "A while loop repeats while a condition holds.",
        ]);

        let docs = r.retrieve("python for loop", 5).await.unwrap();
        assert_eq!(
            bodies(&docs),
            vec![
                "A for loop iterates over a sequence. The for loop is common.",
                "A while loop repeats while a condition holds.",
            ]
        );
    }

    #[tokio::test]
    async fn test_respects_k() {
        let r = retriever(&["loop one", "loop two", "loop three"]);
        let docs = r.retrieve("loop", 2).await.unwrap();
        assert_eq!(docs.len(), 2);
        // Equal scores keep index order
        assert_eq!(bodies(&docs), vec!["loop one", "loop two"]);
    }

    #[tokio::test]
    async fn test_no_overlap_returns_empty() {
        let r = retriever(&["loop one"]);
        assert!(r.retrieve("decorators", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_index_unavailable() {
        let r = LexicalRetriever::new(Arc::new(SnippetIndex::default()));
        assert!(matches!(
            r.retrieve("loop", 5).await,
            Err(RetrievalError::Unavailable(_))
        ));
    }
}
