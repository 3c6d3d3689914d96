//! HTTP client with a bounded timeout and tracing.

use reqwest::{header::HeaderMap, Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// User agent string for `TokenServer`.
const USER_AGENT: &str = concat!("TokenServer/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with a hard per-request timeout and tracing.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client with a custom timeout.
    ///
    /// The timeout covers the whole request, connect through body.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            timeout,
        })
    }

    /// Returns the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks that a URL is absolute and uses http or https.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] otherwise.
    pub fn validate_url(url: &str) -> Result<Url, HttpError> {
        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(format!("{url}: {e}")))?;

        match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
            _ => Err(HttpError::InvalidUrl(format!(
                "{url}: expected an http(s) URL with a host"
            ))),
        }
    }

    /// Performs a GET request with custom headers.
    ///
    /// Non-2xx responses are returned as `Ok`; only transport failures are
    /// errors.
    #[instrument(skip(self, headers), fields(url = %url))]
    pub async fn get_with_headers(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Response, HttpError> {
        debug!("GET request with headers");

        let response = self.inner.get(url).headers(headers).send().await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(HttpClient::validate_url("https://api.anthropic.com/api/oauth/usage").is_ok());
        assert!(HttpClient::validate_url("http://127.0.0.1:1234/usage").is_ok());

        assert!(HttpClient::validate_url("not-a-valid-url").is_err());
        assert!(HttpClient::validate_url("ftp://example.com/usage").is_err());
        assert!(HttpClient::validate_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_with_timeout() {
        let client = HttpClient::with_timeout(Duration::from_secs(3)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(3));
    }
}
