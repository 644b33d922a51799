//! Scrape errors.

use std::path::PathBuf;

use thiserror::Error;

use crewhands_protocols::PageError;

use crate::state::SessionState;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The browser session could not be opened. Fatal to the adapter task.
    #[error("Failed to open browser session: {0}")]
    SessionUnavailable(PageError),

    #[error("No open session; initialize first")]
    NotInitialized,

    #[error("Page error: {0}")]
    Page(#[from] PageError),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to write {path}: {source}")]
    Dump {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Navigation hiccups and timeouts; worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScrapeError::Page(e) if e.is_transient())
    }
}
