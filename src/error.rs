//! Error types for the dimgfx library

use thiserror::Error;

/// Main error type for dimgfx operations
#[derive(Debug, Error)]
pub enum DimError {
    /// Operation invoked against a dimension kind it does not support
    #[error("Dimension kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Override context not registered on the definition
    #[error("Unknown override context: {0}")]
    UnknownContext(u64),

    /// Feature not yet implemented
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for dimgfx operations
pub type Result<T> = std::result::Result<T, DimError>;

impl From<String> for DimError {
    fn from(s: String) -> Self {
        DimError::Custom(s)
    }
}

impl From<&str> for DimError {
    fn from(s: &str) -> Self {
        DimError::Custom(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mismatch_display() {
        let err = DimError::KindMismatch {
            expected: "linear",
            actual: "radial",
        };
        assert_eq!(
            err.to_string(),
            "Dimension kind mismatch: expected linear, got radial"
        );
    }

    #[test]
    fn test_unknown_context_display() {
        let err = DimError::UnknownContext(42);
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_string_conversion() {
        let err: DimError = "bad input".into();
        assert!(matches!(err, DimError::Custom(_)));
    }
}
