//! HTTP job sink.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crewhands_protocols::{CanonicalJob, ContractKind, IngestOutcome, JobSink, SinkError};
use crewhands_throttle::RetryPolicy;

use crate::error::RunnerError;

const IMPORT_PATH: &str = "/api/scraper/import/single";

/// Body of one import request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPayload {
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    pub job_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<String>,
    pub external_id: String,
}

impl From<&CanonicalJob> for ImportPayload {
    fn from(job: &CanonicalJob) -> Self {
        let description = if job.description.is_empty() {
            job.title.clone()
        } else {
            job.description.clone()
        };
        let job_type = match job.contract.kind {
            ContractKind::Temporary => "CONTRACT",
            ContractKind::Permanent | ContractKind::Unknown => "FULL_TIME",
        };
        Self {
            title: job.title.clone(),
            company: job
                .company
                .clone()
                .or_else(|| job.vessel_name().map(str::to_string))
                .unwrap_or_else(|| "Undisclosed".to_string()),
            location: job.location.as_ref().map(|l| l.raw.clone()),
            description,
            salary_range: job.salary.as_ref().map(|s| s.raw.clone()),
            job_type,
            url: job.url.clone(),
            source: job.source.to_string(),
            posted_at: job.posted_at.map(|t| t.to_rfc3339()),
            external_id: job.id.clone(),
        }
    }
}

/// Posts each job to `{endpoint}/api/scraper/import/single`.
///
/// 200 and 201 mean created, 409 means the job already exists. Network
/// failures and 5xx responses are retried.
pub struct HttpJobSink {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl HttpJobSink {
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self, RunnerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RunnerError::Http(e.to_string()))?;
        Ok(Self {
            client,
            url: format!("{}{}", endpoint.trim_end_matches('/'), IMPORT_PATH),
            token: token.filter(|t| !t.is_empty()),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, payload: &ImportPayload) -> Result<IngestOutcome, SinkError> {
        let mut request = self.client.post(&self.url).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| SinkError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200 | 201 => Ok(IngestOutcome::Created),
            409 => Ok(IngestOutcome::Duplicate),
            _ => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|v| v["error"].as_str().or(v["message"].as_str()).map(String::from))
                    .unwrap_or(body);
                Err(SinkError::Rejected { status, message })
            }
        }
    }
}

fn is_retryable(error: &SinkError) -> bool {
    match error {
        SinkError::Request(_) => true,
        SinkError::Rejected { status, .. } => *status >= 500,
        SinkError::Serialization(_) => false,
    }
}

#[async_trait]
impl JobSink for HttpJobSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn ingest(&self, job: &CanonicalJob) -> IngestOutcome {
        let payload = ImportPayload::from(job);
        match self
            .retry
            .run("Job import", is_retryable, || self.post(&payload))
            .await
        {
            Ok(outcome) => {
                debug!(job_id = %job.id, outcome = ?outcome, "Ingested job");
                outcome
            }
            Err(e) => {
                warn!(job_id = %job.id, error = %e, "Job import failed");
                IngestOutcome::Error(e.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
