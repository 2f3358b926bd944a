//! Health check endpoints.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Liveness plus cache backend reachability

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting
/// connections.
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Overall health including the cache backend.
///
/// An unreachable cache reports "degraded" but still answers 200: the
/// service keeps serving from storage when the cache is down, so a dead
/// cache must not take the instance out of rotation.
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let cache_healthy = state.cache.health_check().await;

    let status = if cache_healthy { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "cache": cache_healthy,
    }))
}
