//! LLM Gateway port
//!
//! Defines the interface for the generative text backend. Both the query
//! diversifier and the tutor answer consume it with different prompts.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tutor_domain::StreamEvent;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// `complete_streaming` yields a finite, non-restartable sequence of text
/// fragments. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Name of the backing model, for logs and audit output
    fn model_name(&self) -> &str;

    /// Start a streamed completion for a system prompt and user text
    async fn complete_streaming(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<StreamHandle, GatewayError>;

    /// Run a completion and drain it into a single string
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, GatewayError> {
        self.complete_streaming(system_prompt, user_text)
            .await?
            .collect_text()
            .await
    }
}

/// Handle for receiving streaming events from a completion.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Handle that yields one `Completed` event carrying `text`.
    pub async fn ready(text: String) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // Receiver is alive; the send cannot fail.
        let _ = tx.send(StreamEvent::Completed(text)).await;
        Self::new(rx)
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
            }
        }
        // Channel closed without Completed; return what we have
        Ok(full_text)
    }
}
