//! `run` subcommand.

use std::sync::Arc;

use tracing::{info, warn};

use crewhands_config::{Config, ConfigValidator};
use crewhands_runner::{assemble, chrome_factory};

/// Overrides taken from `run` flags.
#[derive(Debug, Default)]
pub(crate) struct RunFlags {
    pub apply: bool,
    pub no_yotspot: bool,
    pub no_yacrew: bool,
    pub max_applications: Option<usize>,
}

pub(crate) fn apply_flags(config: &mut Config, flags: &RunFlags) {
    if flags.apply {
        config.apply.enabled = true;
    }
    if flags.no_yotspot {
        config.sites.disable("yotspot");
    }
    if flags.no_yacrew {
        config.sites.disable("yacrew");
    }
    if let Some(max) = flags.max_applications {
        config.apply.max_applications = max;
    }
}

pub(crate) async fn run(
    mut config: Config,
    flags: RunFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting CrewHands v{}", env!("CARGO_PKG_VERSION"));
    apply_flags(&mut config, &flags);

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("{}: {}", warning.path, warning.message);
    }

    let factory = Arc::new(chrome_factory(&config.scraping));
    let orchestrator = assemble(&config, factory).await?;
    let outcome = orchestrator.run().await;

    println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    if let Some(path) = outcome.report_path {
        info!("Report written to {}", path.display());
    }
    Ok(())
}
