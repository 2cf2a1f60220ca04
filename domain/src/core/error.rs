//! Domain error types

use thiserror::Error;

/// Domain-level validation errors.
///
/// Raised before any external call is made, so a rejected request never
/// costs a provider round-trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query cannot be empty or only whitespace")]
    EmptyQuery,

    #[error("Query is too long ({length} chars, max {max})")]
    QueryTooLong { length: usize, max: usize },

    #[error("n_paths must be between {min} and {max}, got {value}")]
    InvalidPathCount { value: usize, min: usize, max: usize },

    #[error("top_k must be between 1 and {max}, got {value}")]
    InvalidTopK { value: usize, max: usize },

    #[error("Pipeline timeout must be greater than zero")]
    InvalidTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::EmptyQuery.to_string(),
            "Query cannot be empty or only whitespace"
        );
        assert_eq!(
            DomainError::InvalidPathCount {
                value: 40,
                min: 1,
                max: 32
            }
            .to_string(),
            "n_paths must be between 1 and 32, got 40"
        );
    }
}
