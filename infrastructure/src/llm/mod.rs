//! Generative backend adapters.

mod openai_compat;
mod sse;

pub use openai_compat::{OpenAiCompatGateway, SamplingParams};
pub use sse::{SseEvent, completion_events};
