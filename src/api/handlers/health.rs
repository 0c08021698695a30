//! Health check endpoint.

use axum::{Router, extract::State, routing::get};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::api::envelope::ApiResponse;
use crate::state::AppState;

/// Liveness information about this service and the peers it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub service: String,
    pub version: String,
    pub environment: String,
    /// Names from `[peers]`; reachability is not probed
    pub peers: Vec<String>,
    pub timestamp: Timestamp,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    ApiResponse::ok(HealthResponse {
        service: state.application.name.clone(),
        version: state.application.version.clone(),
        environment: state.environment.to_string(),
        peers: state.peers.names().map(str::to_string).collect(),
        timestamp: Timestamp::now(),
    })
}
