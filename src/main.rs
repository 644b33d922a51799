//! CrewHands - yacht crew job scraping and application automation
//!
//! Main entry point for the CrewHands CLI.

mod cli;
mod cmd_config;
mod cmd_run;

use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crewhands_config::ConfigLoader;

use crate::cli::{Cli, Commands};
use crate::cmd_run::RunFlags;

/// Initialize tracing with console and file output.
///
/// Log files rotate daily under `{data_dir}/logs`. The returned guard must
/// live until exit so buffered lines are flushed.
fn init_tracing(data_dir: &Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("crewhands")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A missing file falls back to defaults; check-config loads strictly.
    let config = ConfigLoader::load_or_default(&cli.config)?;
    let _guard = init_tracing(&config.storage.data_dir)?;

    match cli.command {
        None => cmd_run::run(config, RunFlags::default()).await,
        Some(Commands::Run {
            apply,
            no_yotspot,
            no_yacrew,
            max_applications,
        }) => {
            let flags = RunFlags {
                apply,
                no_yotspot,
                no_yacrew,
                max_applications,
            };
            cmd_run::run(config, flags).await
        }
        Some(Commands::ProbeProxies) => cmd_config::probe_proxies(&config).await,
        Some(Commands::CheckConfig) => cmd_config::check_config(&cli.config),
    }
}
