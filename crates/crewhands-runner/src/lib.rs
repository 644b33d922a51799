//! # CrewHands Runner
//!
//! One run end to end: every enabled board is scraped concurrently under a
//! run-wide timeout, the jobs are pushed to the ingest sink, filtered against
//! the candidate criteria and the applied-jobs ledger, optionally applied to,
//! and summarized in a dated JSON report.
//!
//! [`assemble`] turns a [`crewhands_config::Config`] into a ready
//! [`Orchestrator`].

mod assembly;
mod error;
mod filter;
mod generator;
mod ledger;
mod orchestrator;
mod profile;
mod report;
mod sink;

#[cfg(test)]
mod testing;

pub use assembly::{assemble, chrome_factory, proxy_rotator};
pub use error::RunnerError;
pub use filter::filter_jobs;
pub use generator::HttpTextGenerator;
pub use ledger::{AppliedLedger, LEDGER_FILE};
pub use orchestrator::{ApplyPlan, Orchestrator, RunOutcome};
pub use profile::load_profile;
pub use report::{build_report, report_path, write_report, RunTotals};
pub use sink::{HttpJobSink, ImportPayload};
