//! Configuration value objects shared between layers.

mod output_format;

pub use output_format::OutputFormat;
