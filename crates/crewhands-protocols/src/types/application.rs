//! Application attempt results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classified outcome of one form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// A success indicator was found after submitting.
    Submitted,
    /// An error indicator was found, or the attempt never reached submit.
    Failed,
    /// Neither indicator was found; counted as a success.
    LikelySubmitted,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted | SubmitOutcome::LikelySubmitted)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResult {
    pub job_id: String,
    pub job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub outcome: SubmitOutcome,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApplicationResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
