//! AudioPayload - Raw call recording bytes

/// Fallback MIME type for recordings served without an audio content type
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// A downloaded call recording.
///
/// Never empty: fetchers reject zero-length bodies before building one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Pick the MIME type from a response `Content-Type` header.
    ///
    /// Only `audio/*` types are trusted; parameters such as `; charset` are dropped.
    pub fn resolve_mime(content_type: Option<&str>, fallback: &str) -> String {
        content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| ct.starts_with("audio/") && ct.len() > "audio/".len())
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
