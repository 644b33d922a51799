//! Scrape driver: runs one adapter through a full session.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crewhands_normalize::{deduplicate_jobs, normalize_batch};
use crewhands_protocols::{CanonicalJob, RawRecord};
use crewhands_throttle::{IntervalLimiter, RetryPolicy};

use crate::adapter::{SearchFilters, SiteAdapter};
use crate::dump::dump_jobs;
use crate::error::ScrapeError;

/// Consecutive no-progress advances that end acquisition.
const MAX_STALLS: u32 = 2;

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub filters: SearchFilters,
    /// Minimum delay between two pages of one site.
    pub page_delay: Duration,
    /// Retry policy for the search navigation.
    pub retry: RetryPolicy,
    pub fetch_details: bool,
    /// Where to dump the site's jobs; `None` skips the dump.
    pub output_dir: Option<PathBuf>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            filters: SearchFilters::default(),
            page_delay: Duration::from_secs(2),
            retry: RetryPolicy::default(),
            fetch_details: false,
            output_dir: None,
        }
    }
}

/// Scrape one site and always close its session.
///
/// Returns the site's normalized, deduplicated jobs. Errors are fatal to this
/// site only; the adapter is marked failed and torn down before returning.
pub async fn scrape_site(
    adapter: &mut dyn SiteAdapter,
    options: &ScrapeOptions,
) -> Result<Vec<CanonicalJob>, ScrapeError> {
    let result = run_session(adapter, options).await;
    if let Err(e) = &result {
        error!("Error scraping {} jobs: {}", adapter.source(), e);
        adapter.mark_failed();
    }
    adapter.close().await;
    result
}

async fn run_session(
    adapter: &mut dyn SiteAdapter,
    options: &ScrapeOptions,
) -> Result<Vec<CanonicalJob>, ScrapeError> {
    let source = adapter.source();
    adapter.initialize().await?;
    adapter.login().await;
    search_with_retry(adapter, &options.filters, &options.retry).await?;

    let mut records = acquire(adapter, options.page_delay).await?;
    if options.fetch_details {
        enrich(adapter, &mut records).await;
    }

    let jobs = deduplicate_jobs(normalize_batch(&records, source, Utc::now()));
    info!("Total unique {} jobs scraped: {}", source, jobs.len());

    if let Some(dir) = &options.output_dir {
        if let Err(e) = dump_jobs(dir, source, &jobs, Utc::now().date_naive()).await {
            warn!("Failed to save {} jobs: {}", source, e);
        }
    }
    adapter.mark_saved()?;
    Ok(jobs)
}

async fn search_with_retry(
    adapter: &mut dyn SiteAdapter,
    filters: &SearchFilters,
    retry: &RetryPolicy,
) -> Result<(), ScrapeError> {
    let attempts = retry.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match adapter.search(filters).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() && attempt + 1 < attempts => {
                let delay = retry.delay_for_attempt(attempt);
                warn!(
                    "{} search failed (attempt {}/{}): {}, retrying in {:?}",
                    adapter.source(),
                    attempt + 1,
                    attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Extract, then advance, until two stalls in a row or the iteration limit.
async fn acquire(
    adapter: &mut dyn SiteAdapter,
    page_delay: Duration,
) -> Result<Vec<RawRecord>, ScrapeError> {
    let source = adapter.source();
    let limit = adapter.max_iterations().max(1);
    let pacer = IntervalLimiter::new(page_delay);
    pacer.wait().await;

    let mut records = Vec::new();
    let mut stalls = 0;
    let mut extract = true;
    for iteration in 1..=limit {
        if extract {
            let page_records = adapter.collect_page().await?;
            info!(
                "Found {} new {} jobs on iteration {} (total: {})",
                page_records.len(),
                source,
                iteration,
                records.len() + page_records.len()
            );
            records.extend(page_records);
        }
        if iteration == limit {
            debug!("{}: iteration limit {} reached", source, limit);
            break;
        }

        pacer.wait().await;
        if adapter.advance().await? {
            stalls = 0;
            extract = true;
        } else {
            stalls += 1;
            extract = false;
            if stalls >= MAX_STALLS {
                debug!("{}: no more results", source);
                break;
            }
        }
    }
    Ok(records)
}

async fn enrich(adapter: &mut dyn SiteAdapter, records: &mut [RawRecord]) {
    let source = adapter.source();
    for record in records.iter_mut() {
        let Some(url) = record.url.clone() else {
            continue;
        };
        match adapter.fetch_details(&url).await {
            Ok(details) => record.merge_details(details),
            Err(e) => warn!("Error scraping {} job details for {}: {}", source, url, e),
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
