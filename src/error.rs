//! Error types for the relay

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, RelayError>;

/// Relay error taxonomy
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    /// Every candidate model endpoint was exhausted. Carries the aggregated
    /// human-readable diagnostic, not a structured error.
    #[error("{0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_preserves_diagnostic() {
        let err = RelayError::Upstream("Failed to contact model. Last error: refused".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to contact model. Last error: refused"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = RelayError::SessionNotFound("abc".to_string());
        assert_eq!(err.to_string(), "session not found: abc");
    }
}
