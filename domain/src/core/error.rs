//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Raised when a value object or algorithm is constructed from input that
/// breaks its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid fusion parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_field() {
        let error = DomainError::InvalidParameter("rrf_k must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid fusion parameter: rrf_k must be positive"
        );
    }
}
