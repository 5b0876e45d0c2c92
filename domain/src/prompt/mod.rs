//! Prompt domain
//!
//! Templates for query diversification, hypothetical documents and the
//! grounded tutor answer.

mod template;

pub use template::{INSUFFICIENT_INFO_REPLY, PromptTemplate, UNSUPPORTED_TOPIC_REPLY};
