//! HTTP text generator.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crewhands_protocols::{GenerateError, TextGenerator};

use crate::error::RunnerError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: Option<String>,
}

/// Posts `{"prompt": ..}` to an endpoint and reads `{"text": ..}` back.
pub struct HttpTextGenerator {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpTextGenerator {
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self, RunnerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RunnerError::Http(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest { prompt });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerateError::Request(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Request(format!("status {}: {}", status, body)));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::InvalidResponse(e.to_string()))?;
        let text = body.text.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(GenerateError::Empty);
        }
        debug!(chars = text.len(), "Generated text");
        Ok(text)
    }
}
