//! Result and error types for pagecheck.

use thiserror::Error;

/// Result type for pagecheck operations
pub type PagecheckResult<T> = Result<T, PagecheckError>;

/// Errors that can occur while driving the browser or checking the page
#[derive(Debug, Error)]
pub enum PagecheckError {
    /// A locator matched nothing within the implicit wait
    #[error("Element not found: {locator}")]
    ElementNotFound {
        /// Description of the locator that matched nothing
        locator: String,
    },

    /// A located value differs from the expected one
    #[error("{subject}: expected {expected:?}, got {actual:?}")]
    AssertionMismatch {
        /// What was compared (e.g. "title", "attribute `src` of ...")
        subject: String,
        /// Expected value
        expected: String,
        /// Actual value
        actual: String,
    },

    /// A check failed with an explicit message
    #[error("{message}")]
    Failed {
        /// Failure message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Script evaluation in the page failed
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Pointer input simulation error
    #[error("Input simulation failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PagecheckError {
    /// Create a not-found error for a locator description
    #[must_use]
    pub fn not_found(locator: impl Into<String>) -> Self {
        Self::ElementNotFound {
            locator: locator.into(),
        }
    }

    /// Create a mismatch error
    #[must_use]
    pub fn mismatch(
        subject: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::AssertionMismatch {
            subject: subject.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a failure with an explicit message
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Create a script error
    #[must_use]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Whether this is a check failure (not-found or mismatch) rather than
    /// a browser or environment problem
    #[must_use]
    pub const fn is_check_failure(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::AssertionMismatch { .. } | Self::Failed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_locator() {
        let err = PagecheckError::not_found("tag name `h1`");
        assert_eq!(err.to_string(), "Element not found: tag name `h1`");
        assert!(err.is_check_failure());
    }

    #[test]
    fn test_mismatch_names_both_values() {
        let err = PagecheckError::mismatch("title", "8by8 Challenge", "Home");
        let msg = err.to_string();
        assert!(msg.contains("8by8 Challenge"));
        assert!(msg.contains("Home"));
        assert!(msg.starts_with("title"));
    }

    #[test]
    fn test_failed_is_verbatim() {
        let err = PagecheckError::failed("Inner Menu is not displayed!");
        assert_eq!(err.to_string(), "Inner Menu is not displayed!");
    }

    #[test]
    fn test_infrastructure_errors_are_not_check_failures() {
        let err = PagecheckError::Navigation {
            url: "http://localhost:3000".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(!err.is_check_failure());
        assert!(!PagecheckError::script("boom").is_check_failure());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PagecheckError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
