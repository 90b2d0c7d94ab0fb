//! CallRecord - Stored metadata for one phone call
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, MissingField};

/// Opaque identifier of a call log row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// CallRecord - where to fetch a call's audio and which campaign it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: CallId,
    /// Empty when the telephony provider has not attached a recording yet
    pub recording_url: String,
    /// Empty when the call is not linked to a campaign
    pub campaign_id: String,
    pub agent_name: Option<String>,
    pub campaign_name: Option<String>,
    pub caller_number: Option<String>,
}

impl CallRecord {
    pub fn new(
        id: CallId,
        recording_url: impl Into<String>,
        campaign_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            recording_url: recording_url.into(),
            campaign_id: campaign_id.into(),
            agent_name: None,
            campaign_name: None,
            caller_number: None,
        }
    }

    /// A record without a recording URL or campaign cannot be processed.
    pub fn ensure_processable(&self) -> Result<(), DomainError> {
        let missing = if self.recording_url.trim().is_empty() {
            Some(MissingField::RecordingUrl)
        } else if self.campaign_id.trim().is_empty() {
            Some(MissingField::CampaignId)
        } else {
            None
        };

        match missing {
            Some(field) => Err(DomainError::MissingPrerequisite {
                call_id: self.id.to_string(),
                field,
            }),
            None => Ok(()),
        }
    }
}
