//! `blueprint serve` -- HTTP JSON API over the planner, orchestrator and
//! run history.
//!
//! Security features:
//! - CORS restricted to the configured demo origin (any origin otherwise)
//! - Optional API key authentication via the configured demo key
//! - Request body size limit
//!
//! Endpoints:
//! - GET  /health                 - Server status (exempt from auth)
//! - GET  /builds                 - List stored builds
//! - POST /builds                 - Plan a problem, create a build, run it
//! - GET  /builds/{id}/runs       - Runs of one build
//! - GET  /runs/{id}              - One run with its steps
//! - GET  /runs/{id}/artifacts    - Artifacts recorded by a run
//!
//! All responses use Content-Type: application/json.

mod handlers;
mod middleware;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware as axum_middleware, Json, Router};
use blueprint_codegen::ModelClient;
use blueprint_storage::{BlueprintStorage, InMemoryStorage, JsonFileStorage};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use self::handlers::{
    handle_create_build, handle_get_run, handle_health, handle_list_artifacts,
    handle_list_builds, handle_list_runs, handle_not_found,
};
use self::middleware::auth_middleware;
use self::state::AppState;
use crate::config::Config;
use crate::llm::AnthropicClient;
use crate::orchestrator::Orchestrator;
use crate::verify::verifier_for;

/// Maximum request body size: 1 MB.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Maximum problem statement size: 64 KB.
const MAX_PROBLEM_SIZE: usize = 64 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// CORS layer: the configured origin only, or any origin when unset.
fn cors_layer(demo_origin: Option<&str>) -> Result<CorsLayer, header::InvalidHeaderValue> {
    let origin = match demo_origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => AllowOrigin::from(Any),
    };
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-api-key"),
        ]))
}

/// Build the router over prepared state.
pub(crate) fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/builds", get(handle_list_builds).post(handle_create_build))
        .route("/builds/{id}/runs", get(handle_list_runs))
        .route("/runs/{id}", get(handle_get_run))
        .route("/runs/{id}/artifacts", get(handle_list_artifacts))
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the HTTP server on the given port.
///
/// Runs are stored in `store` when given (shared with `blueprint runs`),
/// otherwise in memory for the lifetime of the process.
pub async fn start_server(
    port: u16,
    config: Config,
    store: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Arc<dyn BlueprintStorage> = match &store {
        Some(path) => {
            tracing::info!(store = %path.display(), "using file store");
            Arc::new(JsonFileStorage::open(path).await?)
        }
        None => Arc::new(InMemoryStorage::new()),
    };
    let verifier = verifier_for(&config)?;
    let client: Option<Arc<dyn ModelClient>> = match AnthropicClient::from_config(&config) {
        Some(c) => {
            tracing::info!(model = %c.model(), "model planning enabled");
            Some(Arc::new(c))
        }
        None => {
            tracing::info!("no API key configured; builds use the default plan");
            None
        }
    };

    if config.demo_key.is_some() {
        tracing::info!("API key authentication enabled");
    }
    let cors = cors_layer(config.demo_origin.as_deref())?;

    let state = Arc::new(AppState {
        orchestrator: Orchestrator::new(storage, verifier, &config.workspace_root),
        client,
        api_key: config.demo_key.clone(),
    });
    let app = router(state, cors);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("blueprint API listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
