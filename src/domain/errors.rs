//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.
//! Error messages carry field names and rule descriptions only — never raw
//! record content, which may hold the identity data this crate exists to
//! strip.

use thiserror::Error;

/// Main veilgate error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific failure classes and provides context for error handling.
#[derive(Debug, Error)]
pub enum VeilgateError {
    /// A privacy technique in the anonymization chain failed.
    ///
    /// Callers of [`AnonymizationEngine::anonymize`] never observe this
    /// variant directly: the engine converts it into a fail-closed
    /// `AnonymizationResult`.
    ///
    /// [`AnonymizationEngine::anonymize`]: crate::anonymization::AnonymizationEngine::anonymize
    #[error("Anonymization error: {0}")]
    Anonymization(String),

    /// A validation rule or the validation engine failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VeilgateError {
    fn from(err: serde_json::Error) -> Self {
        VeilgateError::Serialization(err.to_string())
    }
}

// Conversion from chrono parse errors (generalization of bad timestamps)
impl From<chrono::ParseError> for VeilgateError {
    fn from(err: chrono::ParseError) -> Self {
        VeilgateError::Anonymization(format!("invalid timestamp: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VeilgateError::Configuration("epsilon must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: epsilon must be positive"
        );
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: VeilgateError = json_err.into();
        assert!(matches!(err, VeilgateError::Serialization(_)));
    }

    #[test]
    fn test_chrono_error_conversion() {
        let parse_err = "not-a-date"
            .parse::<chrono::DateTime<chrono::Utc>>()
            .unwrap_err();
        let err: VeilgateError = parse_err.into();
        assert!(matches!(err, VeilgateError::Anonymization(_)));
    }

    #[test]
    fn test_implements_std_error() {
        let err = VeilgateError::Validation("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
