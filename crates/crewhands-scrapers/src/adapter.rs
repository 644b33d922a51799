//! Site adapters.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use crewhands_browser::SessionGuard;
use crewhands_protocols::{Page, RawRecord, SessionFactory, SessionOptions, Source};
use crewhands_throttle::{ProxyRotator, RateLimiter};

use crate::error::ScrapeError;
use crate::extract::{count_cards, extract_cards, extract_details};
use crate::site::{Pagination, SiteDefinition};
use crate::state::SessionState;

/// Optional search criteria sent as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub position: Option<String>,
    pub location: Option<String>,
    pub vessel_type: Option<String>,
}

/// Drives one browser session through a job board.
///
/// Methods are called by the scrape driver in state-machine order; see
/// [`SessionState`].
#[async_trait]
pub trait SiteAdapter: Send {
    fn source(&self) -> Source;

    fn state(&self) -> SessionState;

    /// Page or scroll limit for the acquisition loop.
    fn max_iterations(&self) -> u32;

    /// Open the browser session. Failure is fatal to the adapter.
    async fn initialize(&mut self) -> Result<(), ScrapeError>;

    /// Best effort; returns whether the session is authenticated.
    async fn login(&mut self) -> bool;

    async fn search(&mut self, filters: &SearchFilters) -> Result<(), ScrapeError>;

    /// Records on the current page that have not been returned before.
    async fn collect_page(&mut self) -> Result<Vec<RawRecord>, ScrapeError>;

    /// Load more results; false when nothing new appeared.
    async fn advance(&mut self) -> Result<bool, ScrapeError>;

    async fn fetch_details(&mut self, url: &str) -> Result<RawRecord, ScrapeError>;

    fn mark_saved(&mut self) -> Result<(), ScrapeError>;

    fn mark_failed(&mut self);

    /// Release the session. Safe to call repeatedly and after failures.
    async fn close(&mut self);
}

/// Credentials for a board login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// [`SiteAdapter`] driven entirely by a [`SiteDefinition`].
pub struct BoardAdapter {
    site: SiteDefinition,
    factory: Arc<dyn SessionFactory>,
    limiter: Arc<RateLimiter>,
    proxies: Option<Arc<ProxyRotator>>,
    credentials: Option<Credentials>,
    settle: Duration,
    state: SessionState,
    session: Option<SessionGuard>,
    /// Cards already returned from a scroll page.
    seen_cards: usize,
}

impl BoardAdapter {
    pub fn new(
        site: SiteDefinition,
        factory: Arc<dyn SessionFactory>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            site,
            factory,
            limiter,
            proxies: None,
            credentials: None,
            settle: Duration::from_secs(2),
            state: SessionState::Idle,
            session: None,
            seen_cards: 0,
        }
    }

    pub fn with_proxies(mut self, proxies: Arc<ProxyRotator>) -> Self {
        self.proxies = Some(proxies);
        self
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Wait after pagination before reading the page.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn site(&self) -> &SiteDefinition {
        &self.site
    }

    fn page(&self) -> Result<&dyn Page, ScrapeError> {
        self.session
            .as_ref()
            .map(|guard| guard.page())
            .ok_or(ScrapeError::NotInitialized)
    }

    /// Rate-limited navigation.
    async fn navigate(&self, url: &str) -> Result<(), ScrapeError> {
        let page = self.page()?;
        self.limiter.execute(|| page.goto(url)).await?;
        Ok(())
    }

    async fn settle(&self) {
        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }
    }

    /// `jobs_url` with the active filters as query parameters.
    pub fn search_url(&self, filters: &SearchFilters) -> Result<String, ScrapeError> {
        let mut url = Url::parse(&self.site.jobs_url).map_err(|e| ScrapeError::InvalidUrl {
            url: self.site.jobs_url.clone(),
            message: e.to_string(),
        })?;

        let params = [
            ("position", filters.position.as_deref()),
            ("location", filters.location.as_deref()),
            (self.site.vessel_param, filters.vessel_type.as_deref()),
        ];
        let active: Vec<(&str, &str)> = params
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.trim().is_empty()).map(|v| (key, v)))
            .collect();
        if !active.is_empty() {
            url.query_pairs_mut().extend_pairs(active);
        }
        Ok(url.into())
    }

    async fn try_login(&self, credentials: &Credentials) -> Result<bool, ScrapeError> {
        let rules = self.site.login;
        self.navigate(&self.site.login_url).await?;
        let page = self.page()?;

        let Some(email) = page.query(rules.email).await? else {
            warn!("{}: login form not found", self.site.source);
            return Ok(false);
        };
        page.fill(email, &credentials.email).await?;

        let Some(password) = page.query(rules.password).await? else {
            warn!("{}: password field not found", self.site.source);
            return Ok(false);
        };
        page.fill(password, &credentials.password).await?;

        let Some(submit) = page.query(rules.submit).await? else {
            warn!("{}: login button not found", self.site.source);
            return Ok(false);
        };
        page.click(submit).await?;
        self.settle().await;

        let url = page.current_url().await?;
        Ok(rules.is_success(&url))
    }

    async fn advance_next_control(&self, selector: &str) -> Result<bool, ScrapeError> {
        let page = self.page()?;
        let Some(next) = page.query(selector).await? else {
            debug!("{}: no next page control", self.site.source);
            return Ok(false);
        };
        if page.is_disabled(next).await? {
            debug!("{}: next page control disabled", self.site.source);
            return Ok(false);
        }

        let before_url = page.current_url().await?;
        let before_html = page.content().await?;
        self.limiter.execute(|| page.click(next)).await?;
        self.settle().await;

        let moved = page.current_url().await? != before_url || page.content().await? != before_html;
        Ok(moved)
    }

    async fn advance_scroll(&self, load_more: &str) -> Result<bool, ScrapeError> {
        let page = self.page()?;
        let before_height = page.scroll_height().await?;
        let before_cards = count_cards(&page.content().await?, &self.site.selectors);

        let mut clicked = false;
        if let Some(button) = page.query(load_more).await? {
            if page.is_visible(button).await? && !page.is_disabled(button).await? {
                debug!("{}: clicking load more", self.site.source);
                page.click(button).await?;
                clicked = true;
            }
        }
        if !clicked {
            page.scroll_to_bottom().await?;
        }
        self.settle().await;

        let after_height = page.scroll_height().await?;
        let after_cards = count_cards(&page.content().await?, &self.site.selectors);
        Ok(after_height > before_height || after_cards > before_cards)
    }
}

#[async_trait]
impl SiteAdapter for BoardAdapter {
    fn source(&self) -> Source {
        self.site.source
    }

    fn state(&self) -> SessionState {
        self.state
    }

    fn max_iterations(&self) -> u32 {
        self.site.max_iterations
    }

    async fn initialize(&mut self) -> Result<(), ScrapeError> {
        self.state.advance(SessionState::Initializing)?;
        info!("Initializing {} scraper...", self.site.source);

        let mut options = SessionOptions::default();
        if let Some(route) = self.proxies.as_ref().and_then(|p| p.next()) {
            debug!("{}: using proxy {}", self.site.source, route);
            options = options.with_proxy(route.browser_server());
        }

        let page = self
            .factory
            .open(options)
            .await
            .map_err(ScrapeError::SessionUnavailable)?;
        self.session = Some(SessionGuard::new(page, self.site.source.as_str()));
        info!("{} scraper initialized", self.site.source);
        Ok(())
    }

    async fn login(&mut self) -> bool {
        let Some(credentials) = self.credentials.clone() else {
            warn!("{} credentials not configured, proceeding without login", self.site.source);
            return false;
        };
        if self.state.advance(SessionState::LoggingIn).is_err() {
            return false;
        }

        info!("Logging into {}...", self.site.source);
        match self.try_login(&credentials).await {
            Ok(true) => {
                info!("Successfully logged into {}", self.site.source);
                true
            }
            Ok(false) => {
                warn!("{} login failed, continuing unauthenticated", self.site.source);
                false
            }
            Err(e) => {
                warn!("Error during {} login: {}, continuing unauthenticated", self.site.source, e);
                false
            }
        }
    }

    async fn search(&mut self, filters: &SearchFilters) -> Result<(), ScrapeError> {
        self.state.advance(SessionState::Searching)?;
        let url = self.search_url(filters)?;
        info!("Navigating to: {}", url);
        self.navigate(&url).await?;
        self.seen_cards = 0;
        self.settle().await;
        self.state.advance(SessionState::Paginating)
    }

    async fn collect_page(&mut self) -> Result<Vec<RawRecord>, ScrapeError> {
        self.state.advance(SessionState::Extracting)?;
        let page = self.page()?;
        let html = page.content().await?;
        let url = page.current_url().await?;
        let records = extract_cards(&html, &url, &self.site.selectors);

        let fresh = match self.site.pagination {
            Pagination::NextControl { .. } => records,
            Pagination::Scroll { .. } => {
                let total = records.len();
                let fresh: Vec<RawRecord> = records.into_iter().skip(self.seen_cards).collect();
                self.seen_cards = self.seen_cards.max(total);
                fresh
            }
        };
        debug!("{}: {} new records on {}", self.site.source, fresh.len(), url);
        Ok(fresh)
    }

    async fn advance(&mut self) -> Result<bool, ScrapeError> {
        self.state.advance(SessionState::Paginating)?;
        let progressed = match self.site.pagination {
            Pagination::NextControl { selector } => self.advance_next_control(selector).await,
            Pagination::Scroll { load_more } => self.advance_scroll(load_more).await,
        };
        match progressed {
            Err(ScrapeError::Page(e)) => {
                debug!("{}: no more results ({})", self.site.source, e);
                Ok(false)
            }
            other => other,
        }
    }

    async fn fetch_details(&mut self, url: &str) -> Result<RawRecord, ScrapeError> {
        self.navigate(url).await?;
        self.settle().await;
        let html = self.page()?.content().await?;
        Ok(extract_details(&html, &self.site.details))
    }

    fn mark_saved(&mut self) -> Result<(), ScrapeError> {
        self.state.advance(SessionState::Saved)
    }

    fn mark_failed(&mut self) {
        if !self.state.is_terminal() {
            self.state = SessionState::Failed;
        }
    }

    async fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close().await;
            info!("{} scraper closed", self.site.source);
        }
        self.state = SessionState::Closed;
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
