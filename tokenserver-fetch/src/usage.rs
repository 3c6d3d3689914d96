//! Anthropic OAuth usage API client.
//!
//! # API Endpoint
//!
//! ```text
//! GET https://api.anthropic.com/api/oauth/usage
//! Authorization: Bearer <access_token>
//! anthropic-beta: oauth-2025-04-20
//! ```
//!
//! The response body is returned as-is. Its layout belongs to Anthropic and
//! is not validated here.

use std::error::Error as _;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tokenserver_core::{FetchError, Token, UsageFetcher, UsagePayload};
use tracing::{debug, instrument, warn};

use crate::error::HttpError;
use crate::host::http::HttpClient;

// ============================================================================
// Constants
// ============================================================================

/// OAuth usage endpoint.
pub const USAGE_URL: &str = "https://api.anthropic.com/api/oauth/usage";

/// Beta header value required by the OAuth endpoints.
pub const ANTHROPIC_BETA: &str = "oauth-2025-04-20";

/// Hard timeout for one upstream call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Fetcher
// ============================================================================

/// Fetches the usage document from the Anthropic API.
#[derive(Debug, Clone)]
pub struct AnthropicUsageFetcher {
    http: HttpClient,
    url: String,
}

impl AnthropicUsageFetcher {
    /// Creates a fetcher for the production endpoint with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_endpoint(USAGE_URL, DEFAULT_TIMEOUT)
    }

    /// Creates a fetcher for a custom endpoint and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the client cannot be built.
    pub fn with_endpoint(url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let url = url.into();
        HttpClient::validate_url(&url)?;

        Ok(Self {
            http: HttpClient::with_timeout(timeout)?,
            url,
        })
    }

    /// Endpoint this fetcher calls.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn headers(token: &Token) -> Result<HeaderMap, FetchError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose())).map_err(|_| {
            FetchError::Network("access token contains characters not allowed in a header".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert("anthropic-beta", HeaderValue::from_static(ANTHROPIC_BETA));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl UsageFetcher for AnthropicUsageFetcher {
    #[instrument(skip(self, token), fields(url = %self.url))]
    async fn fetch_usage(&self, token: &Token) -> Result<UsagePayload, FetchError> {
        let headers = Self::headers(token)?;

        let response = self
            .http
            .get_with_headers(&self.url, headers)
            .await
            .map_err(|e| network_error(&e, self.http.timeout()))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = %status, "Usage API rejected the token");
            return Err(FetchError::AuthExpired {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<body unavailable: {e}>"));
            warn!(status = %status, body = %body, "Usage API request failed");
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| network_error(&HttpError::Request(e), self.http.timeout()))?;

        debug!(len = body.len(), "Received usage response");

        serde_json::from_slice(&body).map_err(|e| FetchError::MalformedBody(e.to_string()))
    }
}

/// Maps a transport failure to [`FetchError::Network`], keeping the cause chain.
fn network_error(err: &HttpError, timeout: Duration) -> FetchError {
    let HttpError::Request(inner) = err else {
        return FetchError::Network(err.to_string());
    };

    if inner.is_timeout() {
        return FetchError::Network(format!("request timed out after {}s", timeout.as_secs()));
    }

    let mut reason = inner.to_string();
    let mut source = inner.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    FetchError::Network(reason)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        let headers = AnthropicUsageFetcher::headers(&Token::new("abc")).unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc");
        assert!(headers[header::AUTHORIZATION].is_sensitive());
        assert_eq!(headers["anthropic-beta"], ANTHROPIC_BETA);
    }

    #[test]
    fn test_headers_reject_control_characters() {
        let err = AnthropicUsageFetcher::headers(&Token::new("bad\ntoken")).unwrap_err();
        assert!(!err.to_string().contains("bad"));
    }

    #[test]
    fn test_default_endpoint() {
        let fetcher = AnthropicUsageFetcher::new().unwrap();
        assert_eq!(fetcher.url(), USAGE_URL);
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        assert!(AnthropicUsageFetcher::with_endpoint("not a url", DEFAULT_TIMEOUT).is_err());
    }
}
