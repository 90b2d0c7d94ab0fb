//! Pipeline Errors
//!
//! Every failure names the stage it happened in, so callers can tell
//! "nothing to process" apart from "processing attempted and failed".

use thiserror::Error;

use crate::domain::{DomainError, MissingField};
use crate::ports::{FetchError, ModelError};

/// States of a pipeline run. `Failed` is represented by `Err(PipelineError)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    LoadingCall,
    LoadingQuestionsAndAudio,
    Transcribing,
    Parsing,
    Persisting,
    Done,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::LoadingCall => write!(f, "loading_call"),
            PipelineStage::LoadingQuestionsAndAudio => write!(f, "loading_questions_and_audio"),
            PipelineStage::Transcribing => write!(f, "transcribing"),
            PipelineStage::Parsing => write!(f, "parsing"),
            PipelineStage::Persisting => write!(f, "persisting"),
            PipelineStage::Done => write!(f, "done"),
        }
    }
}

/// Pipeline failure taxonomy
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{entity} not found: {id}")]
    NotFound {
        stage: PipelineStage,
        entity: String,
        id: String,
    },

    #[error("Call {call_id} has no {field}")]
    MissingPrerequisite { call_id: String, field: MissingField },

    #[error("Transport failure while {stage}: {message}")]
    Transport {
        stage: PipelineStage,
        message: String,
    },

    #[error("Upstream failure while {stage}: {message}")]
    Upstream {
        stage: PipelineStage,
        message: String,
    },

    #[error("Store failure while {stage}: {message}")]
    Persistence {
        stage: PipelineStage,
        message: String,
    },
}

impl PipelineError {
    /// Stage the run was in when it failed
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::MissingPrerequisite { .. } => PipelineStage::LoadingCall,
            PipelineError::NotFound { stage, .. }
            | PipelineError::Transport { stage, .. }
            | PipelineError::Upstream { stage, .. }
            | PipelineError::Persistence { stage, .. } => *stage,
        }
    }

    /// Stable machine-readable code
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::NotFound { .. } => "not_found",
            PipelineError::MissingPrerequisite { .. } => "missing_prerequisite",
            PipelineError::Transport { .. } => "transport",
            PipelineError::Upstream { .. } => "upstream",
            PipelineError::Persistence { .. } => "persistence",
        }
    }

    /// The call could not be processed at all, no work was attempted
    pub fn is_nothing_to_process(&self) -> bool {
        matches!(
            self,
            PipelineError::NotFound { .. } | PipelineError::MissingPrerequisite { .. }
        )
    }

    pub(crate) fn from_store(stage: PipelineStage, err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => PipelineError::NotFound {
                stage,
                entity: entity_type,
                id,
            },
            DomainError::MissingPrerequisite { call_id, field } => {
                PipelineError::MissingPrerequisite { call_id, field }
            }
            DomainError::InvalidData(message) | DomainError::Repository(message) => {
                PipelineError::Persistence { stage, message }
            }
        }
    }

    pub(crate) fn from_fetch(err: FetchError) -> Self {
        let stage = PipelineStage::LoadingQuestionsAndAudio;
        match err {
            FetchError::Transport(message) => PipelineError::Transport { stage, message },
            other => PipelineError::Upstream {
                stage,
                message: other.to_string(),
            },
        }
    }

    pub(crate) fn from_model(err: ModelError) -> Self {
        let stage = PipelineStage::Transcribing;
        if err.is_transport() {
            PipelineError::Transport {
                stage,
                message: err.to_string(),
            }
        } else {
            PipelineError::Upstream {
                stage,
                message: err.to_string(),
            }
        }
    }
}
