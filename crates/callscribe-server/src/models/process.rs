//! Call processing DTOs

use std::collections::BTreeMap;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use callscribe::{PipelineError, PipelineResult};

/// Request to process one call
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessCallRequest {
    /// Primary key of the row in `"smartFlo".call_logs`
    #[serde(rename = "call_logsId", default)]
    #[schema(example = "c86d4b0d-2c52-4c8e-9a7e-1f6f0b6f2a11")]
    pub call_logs_id: String,
}

/// Analysis written for the call
#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessCallResponse {
    #[serde(rename = "call_logsId")]
    pub call_logs_id: String,
    #[serde(rename = "campaignId")]
    pub campaign_id: String,
    pub transcription: String,
    /// Answers keyed by question id
    pub answers: BTreeMap<String, String>,
    /// RFC 3339, UTC
    pub processed_at: String,
}

impl From<PipelineResult> for ProcessCallResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            call_logs_id: result.call_id.to_string(),
            campaign_id: result.campaign_id,
            answers: result
                .answers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            transcription: result.transcription,
            processed_at: result
                .processed_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Error body for every failed request
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Stable machine-readable code, e.g. `not_found` or `upstream`
    pub kind: String,
    /// Pipeline stage that failed, absent for request-level errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl ErrorResponse {
    pub fn new(kind: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: kind.to_string(),
            stage: None,
        }
    }
}

impl From<&PipelineError> for ErrorResponse {
    fn from(err: &PipelineError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
            stage: Some(err.stage().to_string()),
        }
    }
}
