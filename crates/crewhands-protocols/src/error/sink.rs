//! Job sink errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink request failed: {0}")]
    Request(String),

    #[error("Sink rejected job (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
