//! CallAnalysis / PipelineResult - Output of processing a call
//!
//! Pure domain entities without infrastructure dependencies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::entities::CallId;
use crate::domain::value_objects::AnswerSet;

fn rfc3339<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// The analysis blob stored against a call, replacing any previous one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallAnalysis {
    pub transcription: String,
    pub answers: AnswerSet,
    #[serde(serialize_with = "rfc3339")]
    pub processed_at: DateTime<Utc>,
}

impl CallAnalysis {
    pub fn new(transcription: String, answers: AnswerSet, processed_at: DateTime<Utc>) -> Self {
        Self {
            transcription,
            answers,
            processed_at,
        }
    }
}

/// Result of one successful pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    #[serde(rename = "call_logsId")]
    pub call_id: CallId,
    #[serde(rename = "campaignId")]
    pub campaign_id: String,
    pub transcription: String,
    pub answers: AnswerSet,
    #[serde(serialize_with = "rfc3339")]
    pub processed_at: DateTime<Utc>,
}

impl PipelineResult {
    pub fn from_analysis(call_id: CallId, campaign_id: String, analysis: CallAnalysis) -> Self {
        Self {
            call_id,
            campaign_id,
            transcription: analysis.transcription,
            answers: analysis.answers,
            processed_at: analysis.processed_at,
        }
    }
}
