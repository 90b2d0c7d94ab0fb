//! Process Routes - Run the call pipeline for one call

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use callscribe::{CallId, CallPipeline, PipelineError, PipelineResult, PipelineStage};

use crate::models::{ErrorResponse, ProcessCallRequest, ProcessCallResponse};
use crate::AppState;

/// Request failures and their HTTP mapping
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Pipeline(PipelineError),
    Timeout(Duration),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Pipeline(err) => match err {
                PipelineError::NotFound { .. } => StatusCode::NOT_FOUND,
                PipelineError::MissingPrerequisite { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                PipelineError::Transport { .. } | PipelineError::Upstream { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                PipelineError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BadRequest(message) => ErrorResponse::new("bad_request", message.clone()),
            ApiError::Timeout(budget) => ErrorResponse::new(
                "timeout",
                format!("Call processing exceeded {:?}", budget),
            ),
            ApiError::Pipeline(err) => ErrorResponse::from(err),
        };
        (status, Json(body)).into_response()
    }
}

/// Transcribe a call and answer its campaign questions
#[utoipa::path(
    post,
    path = "/calls/process",
    request_body = ProcessCallRequest,
    responses(
        (status = 200, description = "Analysis stored", body = ProcessCallResponse),
        (status = 400, description = "Missing or malformed call id", body = ErrorResponse),
        (status = 404, description = "Call not found", body = ErrorResponse),
        (status = 422, description = "Call has no recording or campaign", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse),
        (status = 502, description = "Audio host or model failure", body = ErrorResponse),
        (status = 504, description = "Processing took too long", body = ErrorResponse)
    ),
    tag = "Calls"
)]
pub async fn process_call(
    State(state): State<AppState>,
    payload: Result<Json<ProcessCallRequest>, JsonRejection>,
) -> Result<Json<ProcessCallResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let call_id = payload.call_logs_id.trim();
    if call_id.is_empty() {
        return Err(ApiError::BadRequest("call_logsId is required".to_string()));
    }
    let call_id = CallId::new(call_id);

    let result = within_budget(
        state.pipeline_timeout,
        &call_id,
        run_pipeline(&state, &call_id),
    )
    .await?;

    Ok(Json(result.into()))
}

/// Bound a whole pipeline run; an overrun is reported as `ApiError::Timeout`
async fn within_budget<T>(
    budget: Duration,
    call_id: &CallId,
    run: impl Future<Output = Result<T, PipelineError>>,
) -> Result<T, ApiError> {
    match tokio::time::timeout(budget, run).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            tracing::warn!(
                call_id = %call_id,
                budget_secs = budget.as_secs_f64(),
                "Call processing timed out"
            );
            Err(ApiError::Timeout(budget))
        }
    }
}

async fn run_pipeline(
    state: &AppState,
    call_id: &CallId,
) -> Result<PipelineResult, PipelineError> {
    let session = state
        .store
        .session()
        .await
        .map_err(|e| PipelineError::Persistence {
            stage: PipelineStage::LoadingCall,
            message: e.to_string(),
        })?;

    let pipeline = CallPipeline::new(
        Arc::new(session),
        state.audio.clone(),
        state.model.clone(),
    );
    pipeline.process(call_id).await
}

pub fn router() -> Router<AppState> {
    Router::new().route("/calls/process", post(process_call))
}
