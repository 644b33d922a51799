//! Sequential application batches.

use std::time::Duration;

use tracing::info;

use crewhands_protocols::{ApplicationResult, CanonicalJob, Page};
use crewhands_throttle::IntervalLimiter;

use crate::filler::FormAutoFiller;

/// Totals over every attempt so far.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<ApplicationResult>,
}

/// Applies to jobs one after another on a single page.
///
/// Consecutive applications start at least `delay` apart. A failed
/// application is recorded and the batch moves on.
#[derive(Debug)]
pub struct BatchApplicationProcessor {
    filler: FormAutoFiller,
    pacer: IntervalLimiter,
    custom_message: Option<String>,
    results: Vec<ApplicationResult>,
}

impl BatchApplicationProcessor {
    pub fn new(filler: FormAutoFiller, delay: Duration) -> Self {
        Self {
            filler,
            pacer: IntervalLimiter::new(delay),
            custom_message: None,
            results: Vec::new(),
        }
    }

    /// Message used instead of a cover letter for every job.
    pub fn with_custom_message(mut self, message: Option<String>) -> Self {
        self.custom_message = message;
        self
    }

    /// Apply to `jobs` in order; returns this batch's results.
    pub async fn process(&mut self, page: &dyn Page, jobs: &[CanonicalJob]) -> &[ApplicationResult] {
        let start = self.results.len();
        info!(count = jobs.len(), "Starting application batch");

        for (index, job) in jobs.iter().enumerate() {
            self.pacer.wait().await;
            info!(job_id = %job.id, "Application {}/{}", index + 1, jobs.len());
            let result = self
                .filler
                .apply(page, job, self.custom_message.as_deref())
                .await;
            self.results.push(result);
        }

        let batch = &self.results[start..];
        let successful = batch.iter().filter(|r| r.is_success()).count();
        info!(
            total = batch.len(),
            successful,
            failed = batch.len() - successful,
            "Application batch finished"
        );
        batch
    }

    pub fn results(&self) -> &[ApplicationResult] {
        &self.results
    }

    pub fn summary(&self) -> BatchSummary {
        let successful = self.results.iter().filter(|r| r.is_success()).count();
        BatchSummary {
            total: self.results.len(),
            successful,
            failed: self.results.len() - successful,
            results: self.results.clone(),
        }
    }
}
