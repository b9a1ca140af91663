//! Health check HTTP route handlers
//!
//! Provides endpoints for checking the health of the API and its storage:
//! - `GET /health` - Simple liveness check (returns 200 OK)
//! - `GET /health/ready` - Readiness check (reads the member type seed rows)
//! - `GET /health/live` - Kubernetes-style liveness probe

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::error::{ApiError, ApiResult};
use crate::repositories::Repositories;
use rookery_shared_config::StorageBackend;

/// Shared application state for health check handlers
#[derive(Clone)]
pub struct HealthState {
    pub repos: Repositories,
    pub storage: StorageBackend,
}

impl HealthState {
    pub fn new(repos: Repositories, storage: StorageBackend) -> Self {
        Self { repos, storage }
    }
}

/// Create health check router
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(simple_health))
        .route("/live", get(liveness_probe))
        .route("/ready", get(readiness_probe))
        .with_state(state)
}

/// Simple health check - always returns OK if the server is running
async fn simple_health() -> &'static str {
    "OK"
}

/// Liveness probe for Kubernetes
///
/// Returns 200 if the server process is running and can handle requests.
/// This does not touch storage; that is what readiness is for.
async fn liveness_probe() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe
///
/// Reads the member type reference rows through the repositories. A store
/// that answers but has lost its seed data is not ready either.
///
/// # Response
/// - 200 OK with the backend name and member type count
/// - 503 Service Unavailable with an error body otherwise
async fn readiness_probe(State(state): State<HealthState>) -> ApiResult<impl IntoResponse> {
    let member_types = state.repos.member_types.find_many(None).await?;
    if member_types.is_empty() {
        return Err(ApiError::DatabaseUnavailable);
    }

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ready",
            "storage": state.storage.to_string(),
            "memberTypes": member_types.len(),
        })),
    ))
}
