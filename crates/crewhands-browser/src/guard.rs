//! Scoped ownership of a page session.

use std::ops::Deref;

use tracing::{debug, warn};

use crewhands_protocols::Page;

/// Owns a page for the lifetime of one task.
///
/// Call [`SessionGuard::close`] on the normal path. If the guard is dropped
/// with the page still open (early return, error, cancelled task) the close
/// is handed to the runtime instead, so the session is released on every
/// exit path.
pub struct SessionGuard {
    page: Option<Box<dyn Page>>,
    label: String,
}

impl SessionGuard {
    pub fn new(page: Box<dyn Page>, label: impl Into<String>) -> Self {
        Self {
            page: Some(page),
            label: label.into(),
        }
    }

    pub fn page(&self) -> &dyn Page {
        &**self
    }

    /// Close the page now. Further closes are no-ops.
    pub async fn close(&mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!("Closing {} session failed: {}", self.label, e);
            }
            debug!("{} session closed", self.label);
        }
    }
}

impl Deref for SessionGuard {
    type Target = dyn Page;

    fn deref(&self) -> &Self::Target {
        match &self.page {
            Some(page) => page.as_ref(),
            None => &CLOSED_PAGE,
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        let label = std::mem::take(&mut self.label);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("{} session released on drop", label);
                handle.spawn(async move {
                    if let Err(e) = page.close().await {
                        warn!("Closing {} session failed: {}", label, e);
                    }
                });
            }
            Err(_) => warn!("{} session dropped outside a runtime; relying on process teardown", label),
        }
    }
}

/// Stand-in returned after close; every operation fails with `Closed`.
static CLOSED_PAGE: closed::ClosedPage = closed::ClosedPage;

mod closed {
    use std::path::Path;

    use async_trait::async_trait;
    use crewhands_protocols::{ElementHandle, Page, PageError};

    pub(super) struct ClosedPage;

    #[async_trait]
    impl Page for ClosedPage {
        async fn goto(&self, _url: &str) -> Result<(), PageError> {
            Err(PageError::Closed)
        }
        async fn current_url(&self) -> Result<String, PageError> {
            Err(PageError::Closed)
        }
        async fn content(&self) -> Result<String, PageError> {
            Err(PageError::Closed)
        }
        async fn query(&self, _selector: &str) -> Result<Option<ElementHandle>, PageError> {
            Err(PageError::Closed)
        }
        async fn query_all(&self, _selector: &str) -> Result<Vec<ElementHandle>, PageError> {
            Err(PageError::Closed)
        }
        async fn text(&self, _element: ElementHandle) -> Result<String, PageError> {
            Err(PageError::Closed)
        }
        async fn attribute(
            &self,
            _element: ElementHandle,
            _name: &str,
        ) -> Result<Option<String>, PageError> {
            Err(PageError::Closed)
        }
        async fn is_checked(&self, _element: ElementHandle) -> Result<bool, PageError> {
            Err(PageError::Closed)
        }
        async fn is_visible(&self, _element: ElementHandle) -> Result<bool, PageError> {
            Err(PageError::Closed)
        }
        async fn is_disabled(&self, _element: ElementHandle) -> Result<bool, PageError> {
            Err(PageError::Closed)
        }
        async fn fill(&self, _element: ElementHandle, _value: &str) -> Result<(), PageError> {
            Err(PageError::Closed)
        }
        async fn click(&self, _element: ElementHandle) -> Result<(), PageError> {
            Err(PageError::Closed)
        }
        async fn upload(&self, _element: ElementHandle, _path: &Path) -> Result<(), PageError> {
            Err(PageError::Closed)
        }
        async fn scroll_to_bottom(&self) -> Result<(), PageError> {
            Err(PageError::Closed)
        }
        async fn scroll_height(&self) -> Result<u64, PageError> {
            Err(PageError::Closed)
        }
        async fn snapshot(&self) -> Result<Vec<u8>, PageError> {
            Err(PageError::Closed)
        }
        async fn close(&self) -> Result<(), PageError> {
            Ok(())
        }
    }
}
