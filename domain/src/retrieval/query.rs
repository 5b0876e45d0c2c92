//! Retrieval queries derived from a question.

use serde::{Deserialize, Serialize};

/// One retrieval query (Value Object)
///
/// Either a diversified reformulation of the question, the question itself
/// when diversification failed, or a hypothetical answer document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn into_text(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Query::new(s)
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Query::new(s)
    }
}

/// Parse raw backend output into at most `count` queries.
///
/// Splits on line breaks, trims each line, drops empty lines and exact
/// repeats, and keeps the first `count`. Never fails: malformed output
/// degrades to whatever lines survive.
pub fn parse_query_lines(raw: &str, count: usize) -> Vec<Query> {
    let mut queries: Vec<Query> = Vec::new();
    for line in raw.lines().map(str::trim) {
        if queries.len() == count {
            break;
        }
        if line.is_empty() || queries.iter().any(|q| q.text() == line) {
            continue;
        }
        queries.push(Query::new(line));
    }
    queries
}
