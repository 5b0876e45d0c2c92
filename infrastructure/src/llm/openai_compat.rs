//! OpenAI-compatible chat completions gateway (Groq, LM Studio, vLLM, ...).

use super::sse::{SseEvent, completion_events};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use tutor_application::{GatewayError, LlmGateway, StreamHandle};
use tutor_domain::StreamEvent;

/// Sampling settings sent with every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.6,
            top_p: 1.0,
            max_tokens: 1024,
        }
    }
}

/// Streams chat completions from `{base_url}/chat/completions`.
pub struct OpenAiCompatGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    sampling: SamplingParams,
}

impl OpenAiCompatGateway {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            sampling: SamplingParams::default(),
        })
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    fn request_body(&self, system_prompt: &str, user_text: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_text},
            ],
            "temperature": self.sampling.temperature,
            "top_p": self.sampling.top_p,
            "max_tokens": self.sampling.max_tokens,
            "stream": true,
        })
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatGateway {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete_streaming(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<StreamHandle, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} (model {})", url, self.model);

        let mut request = self
            .client
            .post(&url)
            .json(&self.request_body(system_prompt, user_text));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::ConnectionError(e.to_string())
            }
        })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!("{}: {}", status, text)));
        }

        let (tx, rx) = mpsc::channel(32);
        let events = completion_events(res.bytes_stream());

        tokio::spawn(async move {
            tokio::pin!(events);
            let mut full_text = String::new();

            while let Some(item) = events.next().await {
                match item {
                    Ok(SseEvent::Delta(text)) => {
                        full_text.push_str(&text);
                        if tx.send(StreamEvent::Delta(text)).await.is_err() {
                            // Receiver dropped (cancelled)
                            return;
                        }
                    }
                    Ok(SseEvent::Done) => break,
                    Ok(SseEvent::Error(message)) => {
                        let _ = tx.send(StreamEvent::Error(message)).await;
                        return;
                    }
                    Err(e) => {
                        warn!("Completion stream broke: {}", e);
                        let _ = tx.send(StreamEvent::Error(e)).await;
                        return;
                    }
                }
            }

            let _ = tx.send(StreamEvent::Completed(full_text)).await;
        });

        Ok(StreamHandle::new(rx))
    }
}
