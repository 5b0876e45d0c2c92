//! Application-level configuration.
//!
//! - [`FusionParams`] - query count, fan-out width, top-K, damping and timeouts

pub mod fusion_params;

pub use fusion_params::{DEFAULT_FANOUT_WIDTH, DEFAULT_QUERY_COUNT, FusionParams};
