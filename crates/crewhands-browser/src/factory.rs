//! Chrome-backed [`SessionFactory`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crewhands_protocols::{Page, PageError, SessionFactory, SessionOptions};

use crate::cdp::CdpClient;
use crate::error::BrowserError;
use crate::launcher::{ChromeLauncher, LaunchConfig};
use crate::session::BrowserSession;

/// Launches a fresh browser for every session.
#[derive(Debug, Clone)]
pub struct ChromeSessionFactory {
    launcher: Arc<ChromeLauncher>,
}

impl ChromeSessionFactory {
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            launcher: Arc::new(ChromeLauncher::new(config)),
        }
    }

    async fn open_session(&self, options: &SessionOptions) -> Result<BrowserSession, BrowserError> {
        // Dropping the process on any later error kills the browser.
        let process = self.launcher.launch(options).await?;
        let client = CdpClient::connect(&process.endpoint()).await?;
        let page = client
            .new_page()
            .await?
            .with_load_timeout(self.launcher.config().load_timeout);
        page.set_viewport(options.viewport.width, options.viewport.height)
            .await?;

        info!(
            "Browser session ready on port {} ({}x{})",
            process.port(),
            options.viewport.width,
            options.viewport.height
        );
        Ok(BrowserSession::new(page, client, process))
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn open(&self, options: SessionOptions) -> Result<Box<dyn Page>, PageError> {
        let session = self.open_session(&options).await?;
        Ok(Box::new(session))
    }
}
