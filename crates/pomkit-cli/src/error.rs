//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Library error (parsing, lookup, validation)
    #[error(transparent)]
    Pom(#[from] pomkit::PomError),

    /// A plan references entries the feature mapping does not have
    #[error("Plan validation failed: {message}")]
    PlanValidation {
        /// Error message
        message: String,
    },
}

impl CliError {
    /// Create a plan validation error
    #[must_use]
    pub fn plan_validation(message: impl Into<String>) -> Self {
        Self::PlanValidation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pomkit::PomError;

    #[test]
    fn test_pom_error_is_transparent() {
        let err: CliError = PomError::element_not_found("NEXT").into();
        assert_eq!(err.to_string(), "The element NEXT does not exist");
    }

    #[test]
    fn test_plan_validation_message() {
        let err = CliError::plan_validation("step 2: unknown feature CART");
        assert_eq!(err.to_string(), "Plan validation failed: step 2: unknown feature CART");
    }
}
