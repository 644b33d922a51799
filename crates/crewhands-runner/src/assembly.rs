//! Builds an [`Orchestrator`] from a loaded [`Config`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crewhands_autofill::{CoverLetterWriter, FormAutoFiller, SnapshotStore};
use crewhands_browser::{ChromeSessionFactory, LaunchConfig};
use crewhands_config::{Config, ScrapingConfig};
use crewhands_protocols::{JobSink, NullSink, SessionFactory, Source};
use crewhands_scrapers::{
    BoardAdapter, Credentials, ScrapeOptions, SearchFilters, SiteAdapter, SiteDefinition,
};
use crewhands_throttle::{KeyedRateLimiter, ProxyRotator, RateLimiterConfig, RetryPolicy};

use crate::error::RunnerError;
use crate::generator::HttpTextGenerator;
use crate::orchestrator::{ApplyPlan, Orchestrator};
use crate::profile::load_profile;
use crate::sink::HttpJobSink;

const APPLY_LIMITER_KEY: &str = "apply";

/// Chrome factory configured from the scraping section.
pub fn chrome_factory(scraping: &ScrapingConfig) -> ChromeSessionFactory {
    ChromeSessionFactory::new(LaunchConfig {
        chrome_path: scraping.chrome_path.clone(),
        headless: scraping.headless,
        base_debug_port: scraping.base_debug_port,
        load_timeout: Duration::from_millis(scraping.timeout_ms),
        ..Default::default()
    })
}

/// Proxy rotator for the configured routes, or `None` when proxies are off.
pub fn proxy_rotator(config: &Config) -> Result<Option<Arc<ProxyRotator>>, RunnerError> {
    if !config.proxy.enabled || config.proxy.routes.is_empty() {
        return Ok(None);
    }
    let rotator = ProxyRotator::from_urls(&config.proxy.routes)?
        .with_probe_timeout(Duration::from_secs(config.proxy.probe_timeout_secs));
    Ok(Some(Arc::new(rotator)))
}

/// Wire every enabled site, the sink, and the apply phase from `config`.
///
/// Sessions for scraping and applying both come from `factory`.
pub async fn assemble(
    config: &Config,
    factory: Arc<dyn SessionFactory>,
) -> Result<Orchestrator, RunnerError> {
    let limiters = KeyedRateLimiter::new(RateLimiterConfig {
        requests_per_minute: config.rate_limit.requests_per_minute,
        burst_size: config.rate_limit.burst_size,
    })?;
    let proxies = proxy_rotator(config)?;
    let settle = Duration::from_millis(config.scraping.settle_ms);

    let mut adapters: Vec<Box<dyn SiteAdapter>> = Vec::new();
    for source in Source::ALL {
        let name = source.as_str();
        if !config.sites.is_enabled(name) {
            info!("{} disabled, skipping", source);
            continue;
        }
        let Some(site) = config.sites.site(name) else {
            continue;
        };
        let credentials = site.credentials().map(|(email, password)| Credentials {
            email: email.to_string(),
            password: password.to_string(),
        });
        let mut adapter = BoardAdapter::new(
            SiteDefinition::for_source(source).configure(site),
            factory.clone(),
            limiters.limiter(name),
        )
        .with_credentials(credentials)
        .with_settle(settle);
        if let Some(proxies) = &proxies {
            adapter = adapter.with_proxies(proxies.clone());
        }
        adapters.push(Box::new(adapter));
    }

    let options = ScrapeOptions {
        filters: SearchFilters {
            position: config.search.position.clone(),
            location: config.search.location.clone(),
            vessel_type: config.search.vessel_type.clone(),
        },
        page_delay: Duration::from_millis(config.scraping.page_delay_ms),
        retry: RetryPolicy::default().with_attempts(config.scraping.retries),
        fetch_details: config.scraping.fetch_details,
        output_dir: Some(config.scraping.output_dir.clone()),
    };

    let sink: Arc<dyn JobSink> = match &config.sink.endpoint {
        Some(endpoint) => Arc::new(HttpJobSink::new(
            endpoint,
            config.sink.token.clone(),
            Duration::from_secs(config.sink.timeout_secs),
        )?),
        None => Arc::new(NullSink),
    };

    let mut orchestrator = Orchestrator::new(adapters, &config.storage.data_dir)
        .with_options(options)
        .with_run_timeout(Duration::from_secs(config.scraping.run_timeout_secs))
        .with_sink(sink)
        .with_filters(config.filters.clone());

    if config.apply.enabled {
        match &config.apply.profile_path {
            Some(path) => {
                let profile = load_profile(path).await?;
                let mut letters = CoverLetterWriter::new();
                if let Some(endpoint) = &config.text_generator.endpoint {
                    letters = letters.with_generator(Arc::new(HttpTextGenerator::new(
                        endpoint,
                        config.text_generator.token.clone(),
                        Duration::from_secs(config.text_generator.timeout_secs),
                    )?));
                }
                let filler = FormAutoFiller::new(Arc::new(profile))
                    .with_cover_letters(letters)
                    .with_limiter(limiters.limiter(APPLY_LIMITER_KEY))
                    .with_snapshots(SnapshotStore::new(config.apply.snapshot_dir.clone()))
                    .with_submit_wait(Duration::from_millis(config.apply.submit_wait_ms));
                orchestrator = orchestrator.with_apply(ApplyPlan {
                    filler,
                    factory,
                    max_applications: config.apply.max_applications,
                    delay: Duration::from_millis(config.apply.delay_ms),
                    custom_message: config.apply.custom_message.clone(),
                });
            }
            None => warn!("Applications enabled but no profile configured, skipping"),
        }
    }

    info!(sources = ?orchestrator.sources(), "Run assembled");
    Ok(orchestrator)
}
