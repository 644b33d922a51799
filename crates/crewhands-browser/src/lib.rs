//! # CrewHands Browser
//!
//! Chrome-backed implementation of the [`crewhands_protocols::Page`] seam.
//!
//! Every session gets its own Chrome process with a throwaway profile and,
//! optionally, its own proxy. Sessions talk to Chrome over the DevTools
//! Protocol (see [`cdp`]).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crewhands_browser::{ChromeSessionFactory, LaunchConfig, SessionGuard};
//!
//! let factory = ChromeSessionFactory::new(LaunchConfig::default());
//! let mut page = SessionGuard::new(factory.open(SessionOptions::default()).await?, "yotspot");
//! page.goto("https://www.yotspot.com/job-search.html").await?;
//! page.close().await;
//! ```

pub mod cdp;
mod error;
mod factory;
mod guard;
mod launcher;
mod session;

pub use error::BrowserError;
pub use factory::ChromeSessionFactory;
pub use guard::SessionGuard;
pub use launcher::{BrowserProcess, ChromeLauncher, LaunchConfig};
pub use session::BrowserSession;
