//! Job sink protocol.
//!
//! Canonical jobs are handed to an external ingest interface; long-term
//! storage is not owned by this workspace.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::CanonicalJob;

/// Result of handing one job to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestOutcome {
    Created,
    Duplicate,
    Error(String),
}

#[async_trait]
pub trait JobSink: Send + Sync {
    /// Sink name for logging.
    fn name(&self) -> &str;

    /// Ingest one job. Failures are reported as [`IngestOutcome::Error`].
    async fn ingest(&self, job: &CanonicalJob) -> IngestOutcome;
}

/// Sink used when no ingest endpoint is configured; accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl JobSink for NullSink {
    fn name(&self) -> &str {
        "null"
    }

    async fn ingest(&self, _job: &CanonicalJob) -> IngestOutcome {
        IngestOutcome::Created
    }
}
