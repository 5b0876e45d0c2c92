//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod answer_question;
pub mod generate_queries;
pub mod run_fusion;
pub(crate) mod shared;
#[cfg(test)]
pub(crate) mod test_support;
