//! Server settings
//!
//! Read once at startup from the Shuttle secret store and handed to the
//! adapters. Nothing below the routes reads configuration on its own.

use std::time::Duration;

use callscribe::domain::DEFAULT_AUDIO_MIME;
use thiserror::Error;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Gemini endpoint settings
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Audio download settings
#[derive(Debug, Clone)]
pub struct AudioSettings {
    pub default_mime: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub gemini: GeminiSettings,
    pub audio: AudioSettings,
    pub connect_timeout: Duration,
    /// Upper bound for acquiring a connection and for each statement
    pub db_timeout: Duration,
    /// Wall-clock budget for one whole pipeline run
    pub pipeline_timeout: Duration,
    /// Bearer token for the API; `None` disables authentication
    pub api_key: Option<String>,
}

impl Settings {
    /// Build settings from the Shuttle secret store
    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| secrets.get(key))
    }

    /// Build settings from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &'static str, default: u64| -> Result<Duration, ConfigError> {
            match get(key) {
                None => Ok(Duration::from_secs(default)),
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .map(Duration::from_secs)
                    .ok_or(ConfigError::Invalid { key, value }),
            }
        };

        Ok(Self {
            gemini: GeminiSettings {
                api_key: get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: get("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout: secs("MODEL_TIMEOUT_SECS", 120)?,
            },
            audio: AudioSettings {
                default_mime: get("AUDIO_DEFAULT_MIME")
                    .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string()),
                timeout: secs("AUDIO_TIMEOUT_SECS", 30)?,
            },
            connect_timeout: secs("HTTP_CONNECT_TIMEOUT_SECS", 10)?,
            db_timeout: secs("DB_STATEMENT_TIMEOUT_SECS", 30)?,
            pipeline_timeout: secs("PIPELINE_TIMEOUT_SECS", 300)?,
            api_key: get("CALLSCRIBE_API_KEY"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "secret")])).unwrap();
        assert_eq!(settings.gemini.api_key, "secret");
        assert_eq!(settings.gemini.model, "gemini-2.5-pro");
        assert_eq!(settings.audio.default_mime, "audio/mpeg");
        assert_eq!(settings.audio.timeout, Duration::from_secs(30));
        assert_eq!(settings.gemini.timeout, Duration::from_secs(120));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert_eq!(settings.db_timeout, Duration::from_secs(30));
        assert_eq!(settings.pipeline_timeout, Duration::from_secs(300));
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("MODEL_TIMEOUT_SECS", "45"),
            ("DB_STATEMENT_TIMEOUT_SECS", "5"),
            ("CALLSCRIBE_API_KEY", "token"),
        ]))
        .unwrap();
        assert_eq!(settings.gemini.model, "gemini-2.0-flash");
        assert_eq!(settings.gemini.timeout, Duration::from_secs(45));
        assert_eq!(settings.db_timeout, Duration::from_secs(5));
        assert_eq!(settings.api_key.as_deref(), Some("token"));
    }

    #[test]
    fn test_missing_api_key() {
        let err = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));
    }

    #[test]
    fn test_invalid_timeout() {
        for bad in ["abc", "0", "-5"] {
            let err = Settings::from_lookup(lookup(&[
                ("GEMINI_API_KEY", "secret"),
                ("PIPELINE_TIMEOUT_SECS", bad),
            ]))
            .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid {
                    key: "PIPELINE_TIMEOUT_SECS",
                    ..
                }
            ));
        }
    }
}
