//! Fusion run orchestration types.
//!
//! - [`phase::FusionPhase`] - the linear phases of one run
//! - [`value_objects`] - the run result and per-query failure notes

pub mod phase;
pub mod value_objects;
