//! Liveness endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::response::success_response;
use crate::state::AppState;

/// Liveness response. Fixed; never touches the cache or credential store.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: &'static str,
    /// Server name.
    pub server: &'static str,
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    success_response(&HealthResponse {
        status: "ok",
        server: state.server_name,
    })
}
