//! Per-site job dumps.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::json;
use tracing::info;

use crewhands_protocols::{CanonicalJob, Source};

use crate::error::ScrapeError;
use crate::site::SELECTOR_VERSION;

/// `{dir}/{source}-jobs-YYYY-MM-DD.json`
pub fn dump_path(dir: &Path, source: Source, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}-jobs-{}.json", source, date.format("%Y-%m-%d")))
}

/// Write `jobs` as pretty JSON, replacing an earlier dump from the same day.
///
/// The payload records the source and the [`SELECTOR_VERSION`] the jobs
/// were extracted with.
pub async fn dump_jobs(
    dir: &Path,
    source: Source,
    jobs: &[CanonicalJob],
    date: NaiveDate,
) -> Result<PathBuf, ScrapeError> {
    let path = dump_path(dir, source, date);
    let body = serde_json::to_string_pretty(&json!({
        "source": source,
        "selectorVersion": SELECTOR_VERSION,
        "jobs": jobs,
    }))?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ScrapeError::Dump {
            path: dir.to_path_buf(),
            source,
        })?;
    tokio::fs::write(&path, body)
        .await
        .map_err(|source| ScrapeError::Dump {
            path: path.clone(),
            source,
        })?;

    info!("Saved {} jobs to {}", jobs.len(), path.display());
    Ok(path)
}
