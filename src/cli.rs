//! CLI definitions for CrewHands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CrewHands CLI.
#[derive(Parser)]
#[command(name = "crewhands")]
#[command(about = "Yacht crew job scraping and application automation")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/crewhands.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scrape every enabled board, ingest, filter, and optionally apply (default)
    Run {
        /// Apply to matching jobs after scraping
        #[arg(long)]
        apply: bool,

        /// Skip Yotspot
        #[arg(long)]
        no_yotspot: bool,

        /// Skip YaCrew
        #[arg(long)]
        no_yacrew: bool,

        /// Cap on applications this run
        #[arg(long)]
        max_applications: Option<usize>,
    },

    /// Probe every configured proxy route and print its health
    ProbeProxies,

    /// Load and validate the configuration file
    CheckConfig,
}
