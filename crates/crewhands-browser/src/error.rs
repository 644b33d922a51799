//! Browser launch errors.

use crewhands_protocols::PageError;
use thiserror::Error;

use crate::cdp::CdpError;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Chrome not found. Install Google Chrome or set scraping.chrome_path")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Failed to create browser profile: {0}")]
    Profile(#[from] std::io::Error),

    #[error(transparent)]
    Cdp(#[from] CdpError),
}

/// Anything that goes wrong while opening a session makes it unavailable.
impl From<BrowserError> for PageError {
    fn from(e: BrowserError) -> Self {
        PageError::SessionUnavailable(e.to_string())
    }
}
