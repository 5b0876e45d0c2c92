//! Test doubles for the application ports.

use crate::ports::audit_sink::AuditSink;
use crate::ports::llm_gateway::{GatewayError, LlmGateway, StreamHandle};
use crate::ports::retriever::{RetrievalError, Retriever};
use crate::ports::topic_log::TopicLog;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tutor_domain::{AuditRecord, Document, Question, StreamEvent};

// ==================== Gateway ====================

/// Gateway answering by prompt kind: diversification, HyDE, or tutor answer.
pub(crate) struct MockGateway {
    pub queries: Result<String, String>,
    pub hyde: Result<String, String>,
    pub answer_chunks: Result<Vec<String>, String>,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl MockGateway {
    pub fn with_queries(raw: &str) -> Self {
        Self {
            queries: Ok(raw.to_string()),
            hyde: Err("hyde not scripted".to_string()),
            answer_chunks: Err("answer not scripted".to_string()),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            queries: Err(error.to_string()),
            ..Self::with_queries("")
        }
    }

    pub fn hyde(mut self, text: &str) -> Self {
        self.hyde = Ok(text.to_string());
        self
    }

    pub fn answer(mut self, chunks: &[&str]) -> Self {
        self.answer_chunks = Ok(chunks.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn answer_error(mut self, error: &str) -> Self {
        self.answer_chunks = Err(error.to_string());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn user_texts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, u)| u.clone()).collect()
    }

    pub fn system_prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(s, _)| s.clone()).collect()
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn complete_streaming(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<StreamHandle, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_text.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if system_prompt.trim_end().ends_with("Queries:") {
            let text = self.queries.clone().map_err(GatewayError::ConnectionError)?;
            return Ok(StreamHandle::ready(text).await);
        }
        if system_prompt.trim_end().ends_with("Hypothetical answer:") {
            let text = self.hyde.clone().map_err(GatewayError::RequestFailed)?;
            return Ok(StreamHandle::ready(text).await);
        }

        let chunks = self.answer_chunks.clone().map_err(GatewayError::RequestFailed)?;
        let (tx, rx) = mpsc::channel(chunks.len() + 1);
        for chunk in chunks {
            tx.send(StreamEvent::Delta(chunk)).await.unwrap();
        }
        tx.send(StreamEvent::Completed(String::new())).await.unwrap();
        Ok(StreamHandle::new(rx))
    }
}

// ==================== Retriever ====================

/// Retriever backed by a fixed query -> result table.
///
/// Unknown queries retrieve nothing. Per-query delays let tests finish
/// tasks out of input order.
#[derive(Default)]
pub(crate) struct FixtureRetriever {
    results: HashMap<String, Result<Vec<Document>, RetrievalError>>,
    delays: HashMap<String, Duration>,
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl FixtureRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, bodies: &[&str]) -> Self {
        let docs = bodies.iter().map(|b| Document::new(*b)).collect();
        self.results.insert(query.to_string(), Ok(docs));
        self
    }

    pub fn failing(mut self, query: &str, error: &str) -> Self {
        self.results.insert(
            query.to_string(),
            Err(RetrievalError::QueryFailed(error.to_string())),
        );
        self
    }

    pub fn delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn queried(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }
}

#[async_trait]
impl Retriever for FixtureRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrievalError> {
        self.calls.lock().unwrap().push((query.to_string(), k));
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        match self.results.get(query) {
            Some(Ok(docs)) => Ok(docs.iter().take(k).cloned().collect()),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(Vec::new()),
        }
    }
}

// ==================== Sinks ====================

#[derive(Default)]
pub(crate) struct RecordingAuditSink {
    pub records: Mutex<Vec<AuditRecord>>,
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, record: &AuditRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

#[derive(Default)]
pub(crate) struct RecordingTopicLog {
    pub topics: Mutex<Vec<String>>,
}

impl TopicLog for RecordingTopicLog {
    fn record_unsupported(&self, question: &Question) {
        self.topics.lock().unwrap().push(question.normalized());
    }
}
