//! [`Page`] implementation over a CDP page session.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crewhands_protocols::{ElementHandle, Page, PageError};

use crate::cdp::{CdpClient, CdpError, PageSession, ScreenshotFormat};
use crate::launcher::BrowserProcess;

const TEXT_FN: &str = "function() { return (this.innerText || this.textContent || '').trim(); }";

const ATTRIBUTE_FN: &str = "function(name) {
    if (name === 'value' && 'value' in this) { return this.value; }
    return this.getAttribute(name);
}";

const CHECKED_FN: &str = "function() { return !!this.checked; }";

const VISIBLE_FN: &str = "function() {
    const style = window.getComputedStyle(this);
    const rect = this.getBoundingClientRect();
    return style.display !== 'none' && style.visibility !== 'hidden' && rect.width > 0 && rect.height > 0;
}";

const DISABLED_FN: &str = "function() {
    return !!this.disabled || this.classList.contains('disabled') || this.getAttribute('aria-disabled') === 'true';
}";

const SELECT_FN: &str = "function(value) {
    const wanted = String(value).toLowerCase();
    const option = Array.from(this.options).find(o =>
        o.value.toLowerCase() === wanted || o.text.trim().toLowerCase() === wanted);
    this.value = option ? option.value : value;
    this.dispatchEvent(new Event('input', { bubbles: true }));
    this.dispatchEvent(new Event('change', { bubbles: true }));
}";

const TAG_FN: &str = "function() { return this.tagName.toLowerCase(); }";

/// Upper bound on waiting for a click-triggered navigation to settle.
const CLICK_SETTLE: Duration = Duration::from_secs(5);

/// One browser page backed by its own Chrome process.
pub struct BrowserSession {
    page: PageSession,
    client: CdpClient,
    process: Mutex<Option<BrowserProcess>>,
    closed: AtomicBool,
}

impl BrowserSession {
    pub(crate) fn new(page: PageSession, client: CdpClient, process: BrowserProcess) -> Self {
        Self {
            page,
            client,
            process: Mutex::new(Some(process)),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), PageError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(PageError::Closed)
        } else {
            Ok(())
        }
    }

    async fn call_on(
        &self,
        element: ElementHandle,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, PageError> {
        self.ensure_open()?;
        self.page
            .call_on_node(element.0, function, args)
            .await
            .map_err(|e| element_error(element, e))
    }
}

/// Stale node ids surface as [`PageError::StaleElement`].
fn element_error(element: ElementHandle, e: CdpError) -> PageError {
    if e.is_stale_node() {
        PageError::StaleElement(element.0)
    } else {
        e.into()
    }
}

#[async_trait]
impl Page for BrowserSession {
    async fn goto(&self, url: &str) -> Result<(), PageError> {
        self.ensure_open()?;
        self.page.navigate(url).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, PageError> {
        self.ensure_open()?;
        Ok(self.page.get_url().await?)
    }

    async fn content(&self) -> Result<String, PageError> {
        self.ensure_open()?;
        Ok(self.page.get_content().await?)
    }

    async fn query(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        self.ensure_open()?;
        Ok(self
            .page
            .query_selector(selector)
            .await
            .map_err(|e| selector_error(selector, e))?
            .map(ElementHandle))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        self.ensure_open()?;
        Ok(self
            .page
            .query_selector_all(selector)
            .await
            .map_err(|e| selector_error(selector, e))?
            .into_iter()
            .map(ElementHandle)
            .collect())
    }

    async fn text(&self, element: ElementHandle) -> Result<String, PageError> {
        let value = self.call_on(element, TEXT_FN, Vec::new()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(
        &self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, PageError> {
        let value = self.call_on(element, ATTRIBUTE_FN, vec![json!(name)]).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn is_checked(&self, element: ElementHandle) -> Result<bool, PageError> {
        let value = self.call_on(element, CHECKED_FN, Vec::new()).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn is_visible(&self, element: ElementHandle) -> Result<bool, PageError> {
        let value = self.call_on(element, VISIBLE_FN, Vec::new()).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn is_disabled(&self, element: ElementHandle) -> Result<bool, PageError> {
        let value = self.call_on(element, DISABLED_FN, Vec::new()).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn fill(&self, element: ElementHandle, value: &str) -> Result<(), PageError> {
        let tag = self.call_on(element, TAG_FN, Vec::new()).await?;
        if tag.as_str() == Some("select") {
            self.call_on(element, SELECT_FN, vec![json!(value)]).await?;
            return Ok(());
        }
        self.page
            .set_node_value(element.0, value)
            .await
            .map_err(|e| element_error(element, e))
    }

    async fn click(&self, element: ElementHandle) -> Result<(), PageError> {
        self.ensure_open()?;
        self.page
            .click_node(element.0)
            .await
            .map_err(|e| element_error(element, e))?;
        self.page.wait_for_settle(CLICK_SETTLE).await?;
        Ok(())
    }

    async fn upload(&self, element: ElementHandle, path: &Path) -> Result<(), PageError> {
        self.ensure_open()?;
        if !path.exists() {
            return Err(PageError::Other(format!("{} does not exist", path.display())));
        }
        self.page
            .set_file_input(element.0, path)
            .await
            .map_err(|e| element_error(element, e))
    }

    async fn scroll_to_bottom(&self) -> Result<(), PageError> {
        self.ensure_open()?;
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await?;
        Ok(())
    }

    async fn scroll_height(&self) -> Result<u64, PageError> {
        self.ensure_open()?;
        let value = self.page.evaluate("document.body.scrollHeight").await?;
        Ok(value.as_u64().unwrap_or(0))
    }

    async fn snapshot(&self) -> Result<Vec<u8>, PageError> {
        self.ensure_open()?;
        let data = self.page.screenshot(ScreenshotFormat::Png, true).await?;
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| PageError::Other(format!("Invalid screenshot data: {}", e)))
    }

    async fn close(&self) -> Result<(), PageError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if let Err(e) = self.client.close_page(self.page.target_id()).await {
            debug!("Closing target failed: {}", e);
        }
        if let Err(e) = self.client.close_browser().await {
            debug!("Browser.close failed: {}", e);
        }
        if let Some(mut process) = self.process.lock().await.take() {
            process.kill().await;
            debug!("Browser on port {} shut down", process.port());
        }
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::SeqCst) {
            // The process itself is killed by kill_on_drop.
            warn!("Browser session dropped without close");
        }
    }
}

fn selector_error(selector: &str, e: CdpError) -> PageError {
    match e {
        CdpError::Protocol { message, .. } if message.contains("DOM Error") => {
            PageError::InvalidSelector(format!("{}: {}", selector, message))
        }
        other => other.into(),
    }
}
