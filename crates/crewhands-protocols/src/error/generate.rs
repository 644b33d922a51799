//! Text generation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Text generation request failed: {0}")]
    Request(String),

    #[error("Text generation returned an empty body")]
    Empty,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
