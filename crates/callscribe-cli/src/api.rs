//! Callscribe API Client

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API Client for Callscribe
pub struct CallscribeClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Types
// ============================================

#[derive(Debug, Serialize)]
struct ProcessCallRequest<'a> {
    #[serde(rename = "call_logsId")]
    call_logs_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ProcessCallResponse {
    #[serde(rename = "call_logsId")]
    pub call_logs_id: String,
    #[serde(rename = "campaignId")]
    pub campaign_id: String,
    pub transcription: String,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    pub processed_at: String,
}

/// Successful processing, typed plus the body as received
#[derive(Debug)]
pub struct ProcessedCall {
    pub response: ProcessCallResponse,
    pub raw: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    kind: String,
    #[serde(default)]
    stage: Option<String>,
}

impl CallscribeClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Run the pipeline for one call and wait for the stored analysis
    pub async fn process(&self, call_id: &str) -> Result<ProcessedCall> {
        let url = format!("{}/calls/process", self.base_url);
        let resp = self
            .authorized(self.client.post(&url))
            .json(&ProcessCallRequest {
                call_logs_id: call_id,
            })
            .send()
            .await
            .context("Failed to connect to Callscribe API")?;

        let status = resp.status();
        let body = resp.text().await.context("Failed to read response")?;
        if !status.is_success() {
            bail!("{}", describe_error(status, &body));
        }

        let raw: Value = serde_json::from_str(&body).context("Failed to parse response")?;
        let response = serde_json::from_value(raw.clone()).context("Unexpected response shape")?;
        Ok(ProcessedCall { response, raw })
    }
}

/// Human-readable form of an error response
fn describe_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => match err.stage {
            Some(stage) => format!("{} [{} at {}]: {}", status, err.kind, stage, err.error),
            None => format!("{} [{}]: {}", status, err.kind, err.error),
        },
        Err(_) if status == StatusCode::UNAUTHORIZED => {
            format!("{}: check your API key (callscribe login)", status)
        }
        Err(_) => format!("API error ({}): {}", status, body),
    }
}
