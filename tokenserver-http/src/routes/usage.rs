//! Usage endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use tracing::warn;

use crate::response::{error_response, success_response};
use crate::state::AppState;

/// GET /usage
pub async fn get_usage(State(state): State<Arc<AppState>>) -> Response {
    respond(&state, false).await
}

/// GET /usage/fresh
pub async fn get_usage_fresh(State(state): State<Arc<AppState>>) -> Response {
    respond(&state, true).await
}

async fn respond(state: &AppState, force_refresh: bool) -> Response {
    match state.service.get_usage(force_refresh).await {
        Ok(result) => success_response(&result),
        Err(e) => {
            warn!(kind = ?e.kind(), error = %e, force_refresh, "Usage request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
