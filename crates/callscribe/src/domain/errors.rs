//! Domain Errors
//!
//! Error types for domain and repository operations.

use thiserror::Error;

/// Which prerequisite of a call record is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    RecordingUrl,
    CampaignId,
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingField::RecordingUrl => write!(f, "recording URL"),
            MissingField::CampaignId => write!(f, "campaign id"),
        }
    }
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Call {call_id} has no {field}")]
    MissingPrerequisite { call_id: String, field: MissingField },

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }
}
