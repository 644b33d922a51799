//! `check-config` and `probe-proxies` subcommands.

use std::path::Path;
use std::time::Duration;

use tracing::{error, info, warn};

use crewhands_config::{Config, ConfigLoader, ConfigValidator};
use crewhands_throttle::ProxyRotator;

/// Load `path` strictly and report every validation finding.
pub(crate) fn check_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config);

    for warning in &result.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    for err in &result.errors {
        error!("{}: {}", err.path, err.message);
    }
    let enabled: Vec<&str> = config.sites.enabled.iter().map(String::as_str).collect();
    info!(sites = ?enabled, apply = config.apply.enabled, "Configuration loaded from {}", path.display());

    result.into_result()?;
    println!("Configuration OK");
    Ok(())
}

pub(crate) async fn probe_proxies(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if config.proxy.routes.is_empty() {
        warn!("No proxy routes configured");
        return Ok(());
    }
    let rotator = ProxyRotator::from_urls(&config.proxy.routes)?
        .with_probe_timeout(Duration::from_secs(config.proxy.probe_timeout_secs));
    rotator.test_all(&config.proxy.probe_url).await;

    println!("{}", serde_json::to_string_pretty(&rotator.health_status())?);
    Ok(())
}
