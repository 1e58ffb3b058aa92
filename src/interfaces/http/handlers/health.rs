//! Health check endpoint

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::interfaces::http::router::ApiState;

/// Service health
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the service is running normally
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Roaming networks currently in the directory
    pub networks: usize,
    /// Entity lookups served since startup
    pub lookups: u64,
}

/// Service health check
///
/// No authorization required; intended for liveness monitoring.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        networks: state.directory.network_count(),
        lookups: state.directory.lookup_count(),
    })
}
