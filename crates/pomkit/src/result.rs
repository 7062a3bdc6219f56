//! Result and error types for pomkit.

use std::fmt;
use thiserror::Error;

/// Result type for pomkit operations
pub type PomResult<T> = Result<T, PomError>;

/// Which level of a registry a missing key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Outer key of a nested registry (feature or page namespace)
    Namespace,
    /// Element key of a flat registry, or inner key of a nested one
    Element,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Namespace => write!(f, "parent element"),
            Self::Element => write!(f, "element"),
        }
    }
}

/// Errors that can occur in pomkit
#[derive(Debug, Error)]
pub enum PomError {
    /// Missing or malformed constructor/call argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Requested key is not a member of the registry
    #[error("The {kind} {key} does not exist")]
    KeyNotFound {
        /// Registry level the lookup failed at
        kind: KeyKind,
        /// The key that was requested
        key: String,
    },

    /// The ambient feature mapping was never supplied
    #[error("Feature mapping was not configured (expected {source_hint})")]
    ConfigurationMissing {
        /// Where the mapping was expected to come from
        source_hint: String,
    },

    /// Operation called before its precondition was established
    #[error("Precondition failed: {message}")]
    PreconditionFailed {
        /// Error message
        message: String,
    },

    /// Failure reported by the browser driver
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl PomError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a missing-element error
    #[must_use]
    pub fn element_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound {
            kind: KeyKind::Element,
            key: key.into(),
        }
    }

    /// Create a missing-namespace error
    #[must_use]
    pub fn namespace_not_found(namespace: impl Into<String>) -> Self {
        Self::KeyNotFound {
            kind: KeyKind::Namespace,
            key: namespace.into(),
        }
    }

    /// Create a precondition error
    #[must_use]
    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            message: message.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Whether this is a lookup miss at either registry level
    #[must_use]
    pub const fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_not_found_messages_distinguish_levels() {
        let ns = PomError::namespace_not_found("LOGIN_FORM");
        let el = PomError::element_not_found("SUBMIT");
        assert_eq!(ns.to_string(), "The parent element LOGIN_FORM does not exist");
        assert_eq!(el.to_string(), "The element SUBMIT does not exist");
        assert!(ns.is_key_not_found());
        assert!(el.is_key_not_found());
    }

    #[test]
    fn test_configuration_missing_names_source() {
        let err = PomError::ConfigurationMissing {
            source_hint: "env POM_FEATURES".to_string(),
        };
        assert!(err.to_string().contains("POM_FEATURES"));
        assert!(!err.is_key_not_found());
    }

    #[test]
    fn test_json_error_converts() {
        let err: PomError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, PomError::Json(_)));
    }
}
