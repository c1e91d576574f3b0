//! Result and error types for the harness.

use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that can occur while driving the application under test
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Browser session could not be started
    #[error("Failed to start browser session: {message}")]
    SessionInit {
        /// Error message
        message: String,
    },

    /// Command issued after the session was torn down
    #[error("Session is closed; no further commands can be issued")]
    SessionClosed,

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No element matched the locator
    #[error("No element matching {locator}")]
    NoSuchElement {
        /// Locator description
        locator: String,
    },

    /// Element exists but is not visible/enabled
    #[error("Element matching {locator} is not interactable")]
    NotInteractable {
        /// Locator description
        locator: String,
    },

    /// A wait condition never became true
    #[error("Wait timed out after {ms}ms: {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the condition waited for
        waited_for: String,
    },

    /// An observed value did not match expectation
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// JavaScript evaluation error
    #[error("Script evaluation failed: {message}")]
    Script {
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

impl HarnessError {
    /// True for failures a scenario may tolerate as "already in expected
    /// state" (lookup and wait failures, never assertion failures).
    #[must_use]
    pub const fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::NoSuchElement { .. } | Self::NotInteractable { .. } | Self::Timeout { .. }
        )
    }
}
