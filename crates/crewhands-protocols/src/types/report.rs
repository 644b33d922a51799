//! Run report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one full run. Written once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,
    pub total_jobs: usize,
    pub by_source: BTreeMap<String, usize>,
    pub by_role: BTreeMap<String, usize>,
    pub by_region: BTreeMap<String, usize>,
    pub filtered_jobs: usize,
    pub applications: ApplicationCounts,
    pub ingest: IngestCounts,
    #[serde(default)]
    pub failed_sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCounts {
    pub attempted: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestCounts {
    pub created: usize,
    pub duplicate: usize,
    pub failed: usize,
}
