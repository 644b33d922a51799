//! Throttle errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThrottleError {
    #[error("Invalid rate limit: {0}")]
    InvalidConfig(String),

    #[error("Invalid proxy route '{route}': {message}")]
    InvalidRoute { route: String, message: String },
}
