//! Run report.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crewhands_protocols::{
    ApplicationCounts, ApplicationResult, CanonicalJob, IngestCounts, RunReport, Source,
};

use crate::error::RunnerError;

/// Per-run totals to put in the report, besides the jobs themselves.
#[derive(Debug, Clone, Default)]
pub struct RunTotals {
    pub filtered_jobs: usize,
    pub ingest: IngestCounts,
    pub failed_sources: Vec<Source>,
}

pub fn build_report(
    jobs: &[CanonicalJob],
    applications: &[ApplicationResult],
    totals: &RunTotals,
    timestamp: DateTime<Utc>,
) -> RunReport {
    let mut by_source = BTreeMap::new();
    let mut by_role = BTreeMap::new();
    let mut by_region = BTreeMap::new();
    for job in jobs {
        *by_source.entry(job.source.to_string()).or_insert(0) += 1;
        *by_role.entry(job.role.label().to_string()).or_insert(0) += 1;
        *by_region.entry(job.region().to_string()).or_insert(0) += 1;
    }
    for source in &totals.failed_sources {
        by_source.entry(source.to_string()).or_insert(0);
    }

    let successful = applications.iter().filter(|a| a.is_success()).count();
    RunReport {
        timestamp,
        total_jobs: jobs.len(),
        by_source,
        by_role,
        by_region,
        filtered_jobs: totals.filtered_jobs,
        applications: ApplicationCounts {
            attempted: applications.len(),
            successful,
            failed: applications.len() - successful,
        },
        ingest: totals.ingest,
        failed_sources: totals
            .failed_sources
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

pub fn report_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("report-{}.json", date.format("%Y-%m-%d")))
}

/// Write `report` as `{dir}/report-YYYY-MM-DD.json`, named after its
/// timestamp. A second run on the same day overwrites the file.
pub async fn write_report(dir: &Path, report: &RunReport) -> Result<PathBuf, RunnerError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| RunnerError::io(dir, e))?;
    let path = report_path(dir, report.timestamp.date_naive());
    let content = serde_json::to_string_pretty(report)?;
    tokio::fs::write(&path, content)
        .await
        .map_err(|e| RunnerError::io(&path, e))?;
    info!("Report generated: {}", path.display());
    Ok(path)
}
