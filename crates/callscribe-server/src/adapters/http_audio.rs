//! HTTP recording downloader

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use callscribe::{AudioFetcher, AudioPayload, FetchError};

use crate::config::AudioSettings;

/// Downloads recordings with a plain GET.
#[derive(Clone)]
pub struct HttpAudioFetcher {
    client: Client,
    default_mime: String,
}

impl HttpAudioFetcher {
    pub fn new(settings: &AudioSettings, connect_timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            default_mime: settings.default_mime.clone(),
        })
    }
}

#[async_trait]
impl AudioFetcher for HttpAudioFetcher {
    async fn fetch(&self, url: &str) -> Result<AudioPayload, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let mime_type = AudioPayload::resolve_mime(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            &self.default_mime,
        );

        let bytes = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        if bytes.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(AudioPayload::new(bytes.to_vec(), mime_type))
    }
}
