//! Query value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Maximum accepted query length in characters.
pub const MAX_QUERY_CHARS: usize = 10_000;

/// A query to be answered by the pipeline (Value Object)
///
/// Always trimmed and non-empty. Construction is the only validation point;
/// every stage downstream can rely on the content being usable in a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query {
    content: String,
}

impl Query {
    /// Create a new query, rejecting blank or oversized input
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyQuery);
        }

        let length = trimmed.chars().count();
        if length > MAX_QUERY_CHARS {
            return Err(DomainError::QueryTooLong {
                length,
                max: MAX_QUERY_CHARS,
            });
        }

        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the query content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Query {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Query::try_new(value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        let q = Query::try_new("  Why is the sky blue?\n").unwrap();
        assert_eq!(q.content(), "Why is the sky blue?");
    }

    #[test]
    fn test_empty_query_rejected() {
        assert_eq!(Query::try_new(""), Err(DomainError::EmptyQuery));
        assert_eq!(Query::try_new("   \t"), Err(DomainError::EmptyQuery));
    }

    #[test]
    fn test_oversized_query_rejected() {
        let long = "a".repeat(MAX_QUERY_CHARS + 1);
        assert!(matches!(
            Query::try_new(long),
            Err(DomainError::QueryTooLong { .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Query = serde_json::from_str("\"What is Rust?\"").unwrap();
        assert_eq!(ok.content(), "What is Rust?");
        assert!(serde_json::from_str::<Query>("\"  \"").is_err());
    }
}
