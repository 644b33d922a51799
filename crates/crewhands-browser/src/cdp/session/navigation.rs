//! Navigation operations for CDP page session.

use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::cdp::error::CdpError;

use super::core::PageSession;

const LOAD_EVENT: &str = "Page.loadEventFired";

impl PageSession {
    /// Navigate to URL and wait for the load event.
    pub async fn navigate(&self, url: &str) -> Result<String, CdpError> {
        self.drain_events().await;
        self.invalidate_root();

        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText").and_then(|e| e.as_str()) {
            return Err(CdpError::NavigationFailed(format!("{} at {}", error, url)));
        }

        let frame_id = result["frameId"]
            .as_str()
            .unwrap_or("main")
            .to_string();

        self.wait_for_load().await?;

        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    /// Wait for the next load event, falling back to polling
    /// `document.readyState` when no event arrives.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let deadline = Instant::now() + self.load_timeout;

        {
            let mut events = self.events.lock().await;
            loop {
                match tokio::time::timeout_at(deadline, events.recv()).await {
                    Ok(Some(event)) if event.method.as_deref() == Some(LOAD_EVENT) => {
                        self.invalidate_root();
                        return Ok(());
                    }
                    Ok(Some(event)) => trace!("Skipping event {:?}", event.method),
                    // Channel closed or deadline hit; fall through to polling.
                    Ok(None) | Err(_) => break,
                }
            }
        }

        self.invalidate_root();
        let state = self.evaluate("document.readyState").await?;
        if matches!(state.as_str(), Some("complete" | "interactive")) {
            return Ok(());
        }
        Err(CdpError::Timeout("Page load timeout".to_string()))
    }

    /// Wait until the document settles after an action that may navigate.
    pub async fn wait_for_settle(&self, max_wait: Duration) -> Result<(), CdpError> {
        let deadline = Instant::now() + max_wait;
        loop {
            let state = self.evaluate("document.readyState").await?;
            if state.as_str() == Some("complete") || Instant::now() >= deadline {
                self.invalidate_root();
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    async fn drain_events(&self) {
        let mut events = self.events.lock().await;
        while events.try_recv().is_ok() {}
    }

    /// Get current URL.
    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }
}
