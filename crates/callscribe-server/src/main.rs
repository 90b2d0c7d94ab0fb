use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod auth;
mod config;
mod models;
mod routes;

use adapters::{CallLogSchema, GeminiTranscriptionModel, HttpAudioFetcher, PgCallStore};
use config::Settings;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub store: PgCallStore,
    pub audio: Arc<HttpAudioFetcher>,
    pub model: Arc<GeminiTranscriptionModel>,
    /// Wall-clock budget for one `/calls/process` request
    pub pipeline_timeout: Duration,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Callscribe API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("Callscribe API initializing...");

    let settings = Settings::from_secrets(&secrets).context("Invalid server settings")?;

    let schema = CallLogSchema::load(&pool, settings.db_timeout)
        .await
        .context("Failed to resolve call log column types")?;
    let store = PgCallStore::new(pool, schema, settings.db_timeout);

    let audio = HttpAudioFetcher::new(&settings.audio, settings.connect_timeout)
        .context("Failed to build audio HTTP client")?;
    let model = GeminiTranscriptionModel::new(&settings.gemini, settings.connect_timeout)
        .context("Failed to build Gemini HTTP client")?;

    tracing::info!(
        model = %settings.gemini.model,
        audio_timeout_secs = settings.audio.timeout.as_secs(),
        model_timeout_secs = settings.gemini.timeout.as_secs(),
        pipeline_timeout_secs = settings.pipeline_timeout.as_secs(),
        db_timeout_secs = settings.db_timeout.as_secs(),
        "Gemini transcription configured"
    );

    let api_key: auth::ApiKey = settings.api_key.as_deref().map(Arc::from);
    if api_key.is_some() {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!("No CALLSCRIBE_API_KEY set - authentication disabled");
    }

    let state = AppState {
        store,
        audio: Arc::new(audio),
        model: Arc::new(model),
        pipeline_timeout: settings.pipeline_timeout,
    };

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::process::router())
        .layer(middleware::from_fn_with_state(api_key, auth::auth_middleware));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("Callscribe API ready");

    Ok(router.into())
}
