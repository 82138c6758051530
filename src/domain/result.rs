//! Result type alias for veilgate

use super::errors::VeilgateError;

/// Result type alias for veilgate operations
///
/// Convenience alias using [`VeilgateError`] as the error type. Use this
/// throughout the codebase for fallible operations.
pub type Result<T> = std::result::Result<T, VeilgateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
