//! Route handlers: health, builds, runs and artifacts.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use blueprint_storage::StorageError;

use super::state::AppState;
use super::{json_error, MAX_PROBLEM_SIZE};

/// Map a storage error to a response: unknown ids are 404.
fn storage_error(e: StorageError) -> Response {
    let status = match &e {
        StorageError::BuildNotFound { .. } | StorageError::RunNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(status, &e.to_string()).into_response()
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// GET /builds
pub(crate) async fn handle_list_builds(State(state): State<Arc<AppState>>) -> Response {
    match state.orchestrator.storage().list_builds().await {
        Ok(builds) => (
            StatusCode::OK,
            Json(serde_json::json!({ "builds": builds })),
        )
            .into_response(),
        Err(e) => storage_error(e),
    }
}

/// POST /builds
///
/// Plans the problem, stores the build and runs it to completion. A failed
/// run is a 500 carrying the run error; its record stays queryable.
pub(crate) async fn handle_create_build(
    State(state): State<Arc<AppState>>,
    Json(parsed): Json<serde_json::Value>,
) -> Response {
    let problem = match parsed.get("problem").and_then(|v| v.as_str()) {
        Some(p) if !p.trim().is_empty() => p.to_string(),
        Some(_) => {
            return json_error(StatusCode::BAD_REQUEST, "'problem' must not be empty")
                .into_response()
        }
        None => {
            return json_error(StatusCode::BAD_REQUEST, "missing 'problem' field").into_response()
        }
    };

    if problem.len() > MAX_PROBLEM_SIZE {
        return json_error(
            StatusCode::BAD_REQUEST,
            "problem statement exceeds maximum size",
        )
        .into_response();
    }

    match state
        .orchestrator
        .submit(state.client.as_deref(), &problem)
        .await
    {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "build request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()).into_response()
        }
    }
}

/// GET /builds/{id}/runs
pub(crate) async fn handle_list_runs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let storage = state.orchestrator.storage();
    if let Err(e) = storage.get_build(&id).await {
        return storage_error(e);
    }
    match storage.list_runs(&id).await {
        Ok(runs) => (
            StatusCode::OK,
            Json(serde_json::json!({ "build_id": id, "runs": runs })),
        )
            .into_response(),
        Err(e) => storage_error(e),
    }
}

/// GET /runs/{id}
pub(crate) async fn handle_get_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.orchestrator.storage().get_run(&id).await {
        Ok(run) => (StatusCode::OK, Json(run)).into_response(),
        Err(e) => storage_error(e),
    }
}

/// GET /runs/{id}/artifacts
pub(crate) async fn handle_list_artifacts(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let storage = state.orchestrator.storage();
    if let Err(e) = storage.get_run(&id).await {
        return storage_error(e);
    }
    match storage.list_artifacts(&id).await {
        Ok(artifacts) => (
            StatusCode::OK,
            Json(serde_json::json!({ "run_id": id, "artifacts": artifacts })),
        )
            .into_response(),
        Err(e) => storage_error(e),
    }
}
