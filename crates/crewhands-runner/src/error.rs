//! Runner errors.

use std::path::PathBuf;

use thiserror::Error;

use crewhands_config::ConfigError;
use crewhands_throttle::ThrottleError;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Throttle(#[from] ThrottleError),

    #[error("Failed to read profile {path}: {source}")]
    ProfileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid profile {path}: {source}")]
    ProfileParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Ledger {path} is unreadable, leaving it untouched: {source}")]
    CorruptLedger {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(String),
}

impl RunnerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RunnerError::Io {
            path: path.into(),
            source,
        }
    }
}
