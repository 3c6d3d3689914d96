//! Router construction.

use std::sync::Arc;

use axum::http::{Method, StatusCode, Uri};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, Level};

use crate::response::error_with_endpoints;
use crate::state::AppState;

pub mod status;
pub mod usage;

/// Endpoints listed in 404/405 responses.
pub const AVAILABLE_ENDPOINTS: &[&str] = &["/usage", "/usage/fresh", "/health"];

/// Builds the router with all routes and middleware.
///
/// Paths are matched exactly; wrap with [`build_app`] to ignore trailing
/// slashes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/usage", get(usage::get_usage).fallback(method_not_allowed))
        .route(
            "/usage/fresh",
            get(usage::get_usage_fresh).fallback(method_not_allowed),
        )
        .route("/health", get(status::health).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(Arc::new(state))
}

/// Builds the full application: the router behind trailing-slash trimming.
///
/// Serve it with `axum::ServiceExt::<Request>::into_make_service`; the
/// normalization has to run before routing, so it can't be a router layer.
pub fn build_app(state: AppState) -> NormalizePath<Router> {
    NormalizePath::trim_trailing_slash(create_router(state))
}

/// Fallback for unknown paths.
async fn not_found(uri: Uri) -> Response {
    debug!(path = %uri.path(), "No route");
    error_with_endpoints(StatusCode::NOT_FOUND, "Not found", AVAILABLE_ENDPOINTS)
}

/// Fallback for known paths with an unsupported method.
async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    debug!(method = %method, path = %uri.path(), "Method not allowed");
    error_with_endpoints(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {method} not allowed"),
        AVAILABLE_ENDPOINTS,
    )
}
