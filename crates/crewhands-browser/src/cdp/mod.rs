//! Chrome DevTools Protocol (CDP) client.
//!
//! Talks to a Chrome/Chromium instance over its remote debugging WebSocket
//! using the CDP JSON-RPC protocol. The launcher starts one browser per
//! session; this module only speaks the protocol.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9333").await?;
//! let page = client.new_page(None).await?;
//! page.navigate("https://www.yotspot.com/job-search.html").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
