//! Page automation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Browser session could not be created: {0}")]
    SessionUnavailable(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Stale element handle: {0}")]
    StaleElement(i64),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed")]
    Closed,

    #[error("Page operation failed: {0}")]
    Other(String),
}

impl PageError {
    /// Whether the failure is worth another attempt with the same session.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PageError::Navigation(_) | PageError::Timeout(_) | PageError::Other(_)
        )
    }
}
