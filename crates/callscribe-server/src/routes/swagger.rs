//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{ErrorResponse, ProcessCallRequest, ProcessCallResponse};

#[derive(OpenApi)]
#[openapi(
    paths(super::process::process_call),
    info(
        title = "Callscribe API",
        version = "0.1.0",
        description = "Transcribes recorded calls with Gemini and answers campaign questions about them.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Calls", description = "Call transcription and analysis"),
    ),
    components(schemas(ProcessCallRequest, ProcessCallResponse, ErrorResponse))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_process_route() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/calls/process"));
    }
}
