//! Generate Queries use case (query diversifier).
//!
//! Asks the generative backend for `count` short reformulations of the
//! question and parses them line by line. The use case holds no state between
//! calls and never invents a fallback: when the backend fails the error goes
//! back to the caller, which decides how to degrade.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::use_cases::shared::bounded;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use tutor_domain::{PromptTemplate, Query, Question, parse_query_lines};

/// Errors from the generative backend while diversifying or writing HyDE text.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Use case for diversifying a question into retrieval queries
#[derive(Clone)]
pub struct GenerateQueriesUseCase {
    gateway: Arc<dyn LlmGateway>,
    timeout: Option<Duration>,
}

impl GenerateQueriesUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            timeout: None,
        }
    }

    /// Bound every backend call made by this use case.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Produce at most `count` diversified queries.
    ///
    /// Returns fewer when the backend produced fewer usable lines.
    pub async fn execute(
        &self,
        question: &Question,
        count: usize,
    ) -> Result<Vec<Query>, GenerationError> {
        info!(
            "Generating {} queries with {} for: {}",
            count,
            self.gateway.model_name(),
            question
        );

        let system_prompt = PromptTemplate::diversify_system(question.content(), count);
        let raw = bounded(
            self.timeout,
            async {
                self.gateway
                    .complete(&system_prompt, question.content())
                    .await
                    .map_err(GenerationError::from)
            },
            GenerationError::Timeout,
        )
        .await?;

        let queries = parse_query_lines(&raw, count);
        debug!(
            "Parsed {} queries from {} bytes of output",
            queries.len(),
            raw.len()
        );
        Ok(queries)
    }

    /// Write a hypothetical tutorial snippet answering the question (HyDE).
    ///
    /// The trimmed text is used as one more retrieval query.
    pub async fn hyde_document(&self, question: &Question) -> Result<String, GenerationError> {
        info!("Generating HyDE document for: {}", question);

        let system_prompt = PromptTemplate::hyde_system(question.content());
        let text = bounded(
            self.timeout,
            async {
                self.gateway
                    .complete(&system_prompt, question.content())
                    .await
                    .map_err(GenerationError::from)
            },
            GenerationError::Timeout,
        )
        .await?;

        Ok(text.trim().to_string())
    }
}
