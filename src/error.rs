//! Error types for hard failures.
//!
//! Data-quality problems never surface here: they are reported as
//! [`ValidationError`](crate::validation::ValidationError) records. These
//! errors cover malformed requests and invalid operations on a rule book.

use thiserror::Error;

/// Result type alias for allocation operations.
pub type Result<T> = std::result::Result<T, AllocateError>;

/// Errors that abort an operation.
#[derive(Debug, Error)]
pub enum AllocateError {
    /// Request payload is not valid JSON or lacks a required collection.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Description of what is missing or malformed.
        message: String,
    },

    /// No rule with the given id exists.
    #[error("unknown rule: {id}")]
    UnknownRule {
        /// The rule id that was looked up.
        id: String,
    },

    /// A rule with the given id already exists.
    #[error("duplicate rule: {id}")]
    DuplicateRule {
        /// The conflicting rule id.
        id: String,
    },
}

impl From<serde_json::Error> for AllocateError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRequest {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = AllocateError::UnknownRule { id: "r1".into() };
        assert_eq!(e.to_string(), "unknown rule: r1");

        let e = AllocateError::DuplicateRule { id: "r2".into() };
        assert_eq!(e.to_string(), "duplicate rule: r2");
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err();
        let e: AllocateError = err.into();
        assert!(matches!(e, AllocateError::InvalidRequest { .. }));
        assert!(e.to_string().starts_with("invalid request:"));
    }
}
