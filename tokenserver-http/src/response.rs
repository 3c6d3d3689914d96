//! JSON response helpers.
//!
//! Bodies are pretty-printed with two-space indentation and always carry
//! `Content-Type: application/json; charset=utf-8`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

/// Content type of every response.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Body of a failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    /// Human-readable message.
    pub error: String,
    /// Endpoints the server knows, for 404/405.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<&'a [&'a str]>,
}

/// Serializes `body` as a JSON response with the given status.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec_pretty(body) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to serialize response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
                r#"{"error": "response serialization failed"}"#,
            )
                .into_response()
        }
    }
}

/// 200 with `body`.
pub fn success_response<T: Serialize>(body: &T) -> Response {
    json_response(StatusCode::OK, body)
}

/// `{ "error": message }` with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    json_response(
        status,
        &ErrorBody {
            error: message.into(),
            available_endpoints: None,
        },
    )
}

/// `{ "error": message, "available_endpoints": [...] }` with the given status.
pub fn error_with_endpoints(
    status: StatusCode,
    message: impl Into<String>,
    endpoints: &[&str],
) -> Response {
    json_response(
        status,
        &ErrorBody {
            error: message.into(),
            available_endpoints: Some(endpoints),
        },
    )
}
