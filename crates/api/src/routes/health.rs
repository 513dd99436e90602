use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use storyreel_client::CatalogApi;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `in_memory` or `proxy`.
    pub upstream: &'static str,
    /// Whether the backend answered a catalog request.
    pub upstream_healthy: bool,
}

/// GET /health -- returns gateway and backend health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let upstream_healthy = state.backend.fetch_catalog().await.is_ok();

    let status = if upstream_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        upstream: state.mode.as_str(),
        upstream_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
