//! Audio Fetcher Port
//!
//! Downloads a call recording.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::AudioPayload;

/// Audio download failures
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Audio request failed: {0}")]
    Transport(String),

    #[error("Audio host returned status {status}")]
    Status { status: u16 },

    #[error("Downloaded audio file is empty")]
    EmptyBody,
}

/// Service interface for downloading recordings
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Download the recording at `url`. Zero-length bodies are `EmptyBody`.
    async fn fetch(&self, url: &str) -> Result<AudioPayload, FetchError>;
}
