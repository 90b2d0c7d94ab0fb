//! Gemini `generateContent` client for audio transcription.
//!
//! One request per call: the instruction prompt and the recording travel as
//! two parts of a single user turn, audio inlined as base64.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use callscribe::{AudioPayload, ModelError, TranscriptionModel, TranscriptionPrompt};

use crate::config::GeminiSettings;

/// Gemini-backed transcription model.
#[derive(Clone)]
pub struct GeminiTranscriptionModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTranscriptionModel {
    pub fn new(settings: &GeminiSettings, connect_timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TranscriptionModel for GeminiTranscriptionModel {
    async fn generate(
        &self,
        prompt: &TranscriptionPrompt,
        audio: &AudioPayload,
    ) -> Result<String, ModelError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text {
                        text: &prompt.text,
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &audio.mime_type,
                            data: STANDARD.encode(&audio.bytes),
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|err| ModelError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let body = response
            .text()
            .await
            .map_err(|err| ModelError::Transport(err.to_string()))?;
        let payload: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|err| ModelError::Decode(err.to_string()))?;

        extract_reply(payload)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ============================================
// Request/Response Types
// ============================================

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

// ============================================
// Helper Functions
// ============================================

/// Text of the first part of the first candidate
fn extract_reply(response: GenerateContentResponse) -> Result<String, ModelError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ModelError::NoCandidates)?;
    let part = candidate
        .content
        .parts
        .into_iter()
        .next()
        .ok_or(ModelError::NoContentParts)?;

    if part.text.trim().is_empty() {
        return Err(ModelError::EmptyText);
    }
    Ok(part.text)
}

fn map_http_error(status: StatusCode, body: String) -> ModelError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ModelError::RateLimited;
    }
    ModelError::Status {
        status: status.as_u16(),
        message: body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode as AxumStatus,
        routing::post,
        Json, Router,
    };
    use callscribe::{Question, QuestionCatalog};
    use serde_json::{json, Value};

    fn parse(raw: &str) -> Result<String, ModelError> {
        extract_reply(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn test_extract_first_part_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"TRANSCRIPTION:\nhi"},{"text":"ignored"}]}},{"content":{"parts":[{"text":"second"}]}}]}"#;
        assert_eq!(parse(raw).unwrap(), "TRANSCRIPTION:\nhi");
    }

    #[test]
    fn test_extract_failures() {
        assert!(matches!(parse("{}"), Err(ModelError::NoCandidates)));
        assert!(matches!(
            parse(r#"{"candidates":[]}"#),
            Err(ModelError::NoCandidates)
        ));
        assert!(matches!(
            parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(ModelError::NoContentParts)
        ));
        assert!(matches!(
            parse(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#),
            Err(ModelError::EmptyText)
        ));
    }

    #[test]
    fn test_map_http_error() {
        assert!(matches!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, String::new()),
            ModelError::RateLimited
        ));
        match map_http_error(StatusCode::BAD_REQUEST, "bad audio".to_string()) {
            ModelError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad audio");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_request_wire_format() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text { text: "transcribe" },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "audio/mpeg",
                            data: STANDARD.encode([1u8, 2, 3]),
                        },
                    },
                ],
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "transcribe"},
                        {"inline_data": {"mime_type": "audio/mpeg", "data": "AQID"}}
                    ]
                }]
            })
        );
    }

    type Captured = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

    async fn serve(status: AxumStatus, reply: Value) -> (String, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route(
                "/models/:call",
                post(
                    |State((captured, status, reply)): State<(Captured, AxumStatus, Value)>,
                     Path(call): Path<String>,
                     Query(query): Query<HashMap<String, String>>,
                     Json(body): Json<Value>| async move {
                        captured
                            .lock()
                            .unwrap()
                            .push((call, query.get("key").cloned(), body));
                        (status, Json(reply))
                    },
                ),
            )
            .with_state((captured.clone(), status, reply));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/models/"), captured)
    }

    fn model(base_url: String) -> GeminiTranscriptionModel {
        let settings = GeminiSettings {
            api_key: "test-key".to_string(),
            model: "gemini-test".to_string(),
            base_url,
            timeout: Duration::from_secs(5),
        };
        GeminiTranscriptionModel::new(&settings, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_round_trip_against_stub() {
        let (base, captured) = serve(
            AxumStatus::OK,
            json!({"candidates":[{"content":{"parts":[{"text":"TRANSCRIPTION:\nhello"}]}}]}),
        )
        .await;

        let catalog = QuestionCatalog::new(vec![Question::new(
            "q1",
            "Interested?",
            Default::default(),
        )]);
        let prompt = TranscriptionPrompt::for_questions(&catalog);
        let audio = AudioPayload::new(vec![0xFF, 0xFB], "audio/wav");

        let reply = model(base).generate(&prompt, &audio).await.unwrap();
        assert_eq!(reply, "TRANSCRIPTION:\nhello");

        let captured = captured.lock().unwrap();
        let (call, key, body) = &captured[0];
        assert_eq!(call, "gemini-test:generateContent");
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], prompt.text.as_str());
        assert_eq!(
            body["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "audio/wav"
        );
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["data"], "//s=");
    }

    #[tokio::test]
    async fn test_generate_maps_rate_limit() {
        let (base, _) = serve(
            AxumStatus::TOO_MANY_REQUESTS,
            json!({"error": {"message": "quota"}}),
        )
        .await;

        let err = model(base)
            .generate(
                &TranscriptionPrompt::transcribe_only(),
                &AudioPayload::new(vec![1], "audio/mpeg"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::RateLimited));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_generate_unreachable_is_transport() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = model(format!("http://{addr}/models"))
            .generate(
                &TranscriptionPrompt::transcribe_only(),
                &AudioPayload::new(vec![1], "audio/mpeg"),
            )
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
