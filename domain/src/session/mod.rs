//! Generative backend session domain.
//!
//! - [`stream::StreamEvent`] - one event of a streamed completion

pub mod stream;
