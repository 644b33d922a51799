//! Page automation protocol.
//!
//! Site adapters and the form filler drive pages only through [`Page`], so
//! they stay independent of the browser implementation behind it.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PageError;

#[cfg(any(test, feature = "fake-page"))]
pub mod fake;

/// Opaque handle to an element on the current document.
///
/// Handles are invalidated by navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub i64);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One exclusive browser page.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate and wait for the document to load.
    async fn goto(&self, url: &str) -> Result<(), PageError>;

    async fn current_url(&self) -> Result<String, PageError>;

    /// Serialized HTML of the current document.
    async fn content(&self) -> Result<String, PageError>;

    /// First element matching a CSS selector.
    async fn query(&self, selector: &str) -> Result<Option<ElementHandle>, PageError>;

    /// All elements matching a CSS selector, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError>;

    async fn text(&self, element: ElementHandle) -> Result<String, PageError>;

    async fn attribute(
        &self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, PageError>;

    async fn is_checked(&self, element: ElementHandle) -> Result<bool, PageError>;

    async fn is_visible(&self, element: ElementHandle) -> Result<bool, PageError>;

    async fn is_disabled(&self, element: ElementHandle) -> Result<bool, PageError>;

    /// Replace the value of an input, textarea or select.
    async fn fill(&self, element: ElementHandle, value: &str) -> Result<(), PageError>;

    async fn click(&self, element: ElementHandle) -> Result<(), PageError>;

    /// Attach a local file to a file input.
    async fn upload(&self, element: ElementHandle, path: &Path) -> Result<(), PageError>;

    async fn scroll_to_bottom(&self) -> Result<(), PageError>;

    /// Scrollable height of the document body.
    async fn scroll_height(&self) -> Result<u64, PageError>;

    /// Full-page PNG capture.
    async fn snapshot(&self) -> Result<Vec<u8>, PageError>;

    /// Release the session. Safe to call more than once.
    async fn close(&self) -> Result<(), PageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Options for opening a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub viewport: Viewport,
    /// Value for the browser's proxy server flag, `scheme://host:port`.
    pub proxy_server: Option<String>,
}

impl SessionOptions {
    pub fn with_proxy(mut self, proxy_server: impl Into<String>) -> Self {
        self.proxy_server = Some(proxy_server.into());
        self
    }
}

/// Opens exclusive page sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self, options: SessionOptions) -> Result<Box<dyn Page>, PageError>;
}
