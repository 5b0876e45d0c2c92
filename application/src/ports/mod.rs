//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit_sink;
pub mod llm_gateway;
pub mod progress;
pub mod retriever;
pub mod topic_log;
