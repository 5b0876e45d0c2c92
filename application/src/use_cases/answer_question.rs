//! Answer Question use case.
//!
//! Runs a fusion pass, then streams the tutor's answer over the assembled
//! context. The answer model sees only what fusion retrieved; the
//! instructions tell it to reply with [`UNSUPPORTED_TOPIC_REPLY`] when the
//! question is outside the material, and those questions are recorded in the
//! topic log.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::topic_log::{NoTopicLog, TopicLog};
use crate::use_cases::run_fusion::{RunFusionError, RunFusionUseCase};
use crate::use_cases::shared::{bounded, is_cancelled};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tutor_domain::util::truncate_str;
use tutor_domain::{FusionResult, PromptTemplate, Question, StreamEvent, UNSUPPORTED_TOPIC_REPLY};

/// Errors that can occur while answering a question
#[derive(Error, Debug)]
pub enum AnswerQuestionError {
    #[error(transparent)]
    Fusion(#[from] RunFusionError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Answer generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("No answer from model")]
    EmptyAnswer,

    #[error("Operation cancelled")]
    Cancelled,
}

impl AnswerQuestionError {
    pub fn is_cancelled(&self) -> bool {
        match self {
            AnswerQuestionError::Cancelled => true,
            AnswerQuestionError::Fusion(e) => e.is_cancelled(),
            _ => false,
        }
    }
}

/// Input for the [`AnswerQuestionUseCase`].
#[derive(Debug, Clone)]
pub struct AnswerQuestionInput {
    pub question: Question,
    /// Prior conversation as plain text; empty for a fresh session.
    pub history: String,
}

impl AnswerQuestionInput {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            history: String::new(),
        }
    }

    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = history.into();
        self
    }
}

/// Output of a successful answer.
#[derive(Debug, Clone)]
pub struct AnswerOutput {
    pub answer: String,
    pub fusion: FusionResult,
    pub elapsed: Duration,
}

impl AnswerOutput {
    /// True if the model declined the question as out of scope.
    pub fn is_unsupported_topic(&self) -> bool {
        self.answer.trim() == UNSUPPORTED_TOPIC_REPLY
    }
}

/// Use case for answering a learner's question over fused context
pub struct AnswerQuestionUseCase {
    gateway: Arc<dyn LlmGateway>,
    fusion: RunFusionUseCase,
    topic_log: Arc<dyn TopicLog>,
    instructions: String,
    timeout: Option<Duration>,
    cancellation_token: Option<CancellationToken>,
}

impl AnswerQuestionUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, fusion: RunFusionUseCase) -> Self {
        Self {
            gateway,
            fusion,
            topic_log: Arc::new(NoTopicLog),
            instructions: PromptTemplate::tutor_instructions(),
            timeout: None,
            cancellation_token: None,
        }
    }

    pub fn with_topic_log(mut self, topic_log: Arc<dyn TopicLog>) -> Self {
        self.topic_log = topic_log;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Bound the whole answer stream.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Share one cancellation token between fusion and the answer stream.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.fusion = self.fusion.with_cancellation(token.clone());
        self.cancellation_token = Some(token);
        self
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub async fn execute(
        &self,
        input: AnswerQuestionInput,
    ) -> Result<AnswerOutput, AnswerQuestionError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: AnswerQuestionInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<AnswerOutput, AnswerQuestionError> {
        let started = Instant::now();
        let fusion = self
            .fusion
            .execute_with_progress(&input.question, progress)
            .await?;

        if fusion.is_empty() {
            debug!("Fusion produced no context, answering without it");
        }

        let prompt = PromptTemplate::answer_prompt(
            &self.instructions,
            &fusion.context,
            &input.history,
            input.question.content(),
        );

        let answer = bounded(
            self.timeout,
            self.stream_answer(&prompt, &input.question, progress),
            AnswerQuestionError::Timeout,
        )
        .await?;

        let answer = answer.trim().to_string();
        if answer.is_empty() {
            return Err(AnswerQuestionError::EmptyAnswer);
        }

        if answer == UNSUPPORTED_TOPIC_REPLY {
            info!("Unsupported topic: {}", input.question.normalized());
            self.topic_log.record_unsupported(&input.question);
        }

        let elapsed = started.elapsed();
        info!(
            "Answered in {:.2}s ({} bytes)",
            elapsed.as_secs_f64(),
            answer.len()
        );

        Ok(AnswerOutput {
            answer,
            fusion,
            elapsed,
        })
    }

    /// Stream the answer, forwarding fragments to `progress`.
    async fn stream_answer(
        &self,
        prompt: &str,
        question: &Question,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, AnswerQuestionError> {
        if is_cancelled(&self.cancellation_token) {
            return Err(AnswerQuestionError::Cancelled);
        }

        let mut stream = self
            .gateway
            .complete_streaming(prompt, question.content())
            .await?;

        progress.on_answer_start();
        let mut answer = String::new();

        loop {
            let event = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        progress.on_answer_end();
                        return Err(AnswerQuestionError::Cancelled);
                    }
                    event = stream.receiver.recv() => event,
                }
            } else {
                stream.receiver.recv().await
            };

            match event {
                Some(StreamEvent::Delta(chunk)) => {
                    progress.on_answer_chunk(&chunk);
                    answer.push_str(&chunk);
                }
                Some(StreamEvent::Completed(text)) => {
                    if answer.is_empty() && !text.is_empty() {
                        progress.on_answer_chunk(&text);
                        answer = text;
                    }
                    break;
                }
                Some(StreamEvent::Error(e)) => {
                    warn!(
                        "Answer stream failed after {} bytes: {}",
                        answer.len(),
                        truncate_str(&e, 200)
                    );
                    progress.on_answer_end();
                    return Err(GatewayError::RequestFailed(e).into());
                }
                None => break,
            }
        }

        progress.on_answer_end();
        Ok(answer)
    }
}
