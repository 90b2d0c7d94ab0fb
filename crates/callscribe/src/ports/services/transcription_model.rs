//! Transcription Model Port
//!
//! One multimodal request per call: instruction prompt plus inlined audio,
//! answered with a single text reply.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AudioPayload, TranscriptionPrompt};

/// Model invocation failures
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    Transport(String),

    #[error("Model API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Model API rate limited")]
    RateLimited,

    #[error("Failed to decode model response: {0}")]
    Decode(String),

    #[error("No candidates in model response")]
    NoCandidates,

    #[error("No content parts in model response")]
    NoContentParts,

    #[error("Empty text in model response")]
    EmptyText,
}

impl ModelError {
    /// Network-level failure, as opposed to an unusable answer from a reachable endpoint
    pub fn is_transport(&self) -> bool {
        matches!(self, ModelError::Transport(_))
    }
}

/// Generative model interface
///
/// # Example
///
/// ```rust,ignore
/// use callscribe::ports::TranscriptionModel;
///
/// struct GeminiModel { /* ... */ }
///
/// #[async_trait]
/// impl TranscriptionModel for GeminiModel {
///     async fn generate(&self, prompt: &TranscriptionPrompt, audio: &AudioPayload)
///         -> Result<String, ModelError> {
///         // POST generateContent
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait TranscriptionModel: Send + Sync {
    /// Send the prompt and audio, returning the model's raw reply text
    async fn generate(
        &self,
        prompt: &TranscriptionPrompt,
        audio: &AudioPayload,
    ) -> Result<String, ModelError>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
