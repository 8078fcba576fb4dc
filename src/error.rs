//! Error types for outcomes query construction.

use thiserror::Error;

/// Errors raised while turning request parameters into a [`QueryDefinition`].
///
/// All variants are client-input problems. None of them are retried.
///
/// [`QueryDefinition`]: crate::query::QueryDefinition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Unknown or missing vocabulary: field, groupBy, category, reason, outcome.
    #[error("{0}")]
    InvalidField(String),

    /// Individually valid parameters that cannot be answered together.
    #[error("{0}")]
    InvalidQuery(String),

    /// Malformed or unanswerable time window.
    #[error("{0}")]
    InvalidParams(String),
}

impl QueryError {
    /// Short name of the variant, used in log lines and by the Python binding.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::InvalidField(_) => "invalid_field",
            QueryError::InvalidQuery(_) => "invalid_query",
            QueryError::InvalidParams(_) => "invalid_params",
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message() {
        let err = QueryError::InvalidField(r#"Invalid category: "zzz""#.to_string());
        assert_eq!(err.to_string(), r#"Invalid category: "zzz""#);
        assert_eq!(err.kind(), "invalid_field");
    }
}
