//! Embedding retriever: cosine similarity against stored snippet vectors.

use super::{IndexError, SnippetIndex};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tutor_application::{RetrievalError, Retriever};
use tutor_domain::Document;

/// Turns query text into a vector comparable with the stored embeddings.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexError>;
}

/// Client for an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiEmbedder {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, IndexError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IndexError::Embedding(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }
}

#[async_trait]
impl QueryEmbedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexError> {
        let url = format!("{}/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": [text],
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request
            .send()
            .await
            .map_err(|e| IndexError::Embedding(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(IndexError::Embedding(format!("{}: {}", status, text)));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| IndexError::Embedding(e.to_string()))?;
        parse_embedding(&payload)
    }
}

/// First vector of an `/embeddings` response.
fn parse_embedding(payload: &Value) -> Result<Vec<f32>, IndexError> {
    payload["data"]
        .as_array()
        .and_then(|data| data.first())
        .and_then(|item| item["embedding"].as_array())
        .map(|vals| {
            vals.iter()
                .filter_map(|v| v.as_f64().map(|f| f as f32))
                .collect::<Vec<f32>>()
        })
        .filter(|v| !v.is_empty())
        .ok_or_else(|| IndexError::Embedding("response carried no embedding".to_string()))
}

/// Cosine similarity (normalized dot product)
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Ranks snippets by cosine similarity to the embedded query.
///
/// Snippets without an embedding, or with a different dimension than the
/// query vector, are skipped.
pub struct EmbeddingRetriever {
    index: Arc<SnippetIndex>,
    embedder: Arc<dyn QueryEmbedder>,
}

impl EmbeddingRetriever {
    /// Fails when the index carries no embeddings at all.
    pub fn new(
        index: Arc<SnippetIndex>,
        embedder: Arc<dyn QueryEmbedder>,
    ) -> Result<Self, IndexError> {
        if !index.snippets().iter().any(|s| s.embedding.is_some()) {
            return Err(IndexError::MissingEmbeddings);
        }
        Ok(Self { index, embedder })
    }
}

#[async_trait]
impl Retriever for EmbeddingRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrievalError> {
        let vector = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| RetrievalError::Unavailable(e.to_string()))?;

        let mut scored: Vec<(usize, f32)> = self
            .index
            .snippets()
            .iter()
            .enumerate()
            .filter_map(|(i, snippet)| {
                let stored = snippet.embedding.as_ref()?;
                (stored.len() == vector.len()).then(|| (i, cosine_similarity(&vector, stored)))
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        debug!("Scored {} snippets for '{}'", scored.len(), query);

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, _)| self.index.snippets()[i].document.clone())
            .collect())
    }
}
