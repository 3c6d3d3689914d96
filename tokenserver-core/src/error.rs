//! Core error types for `TokenServer`.
//!
//! Every error keeps a human-readable message that is passed unchanged to
//! HTTP clients. None of the messages ever contain the bearer token.

use thiserror::Error;

// ============================================================================
// Credential Error
// ============================================================================

/// Failure to obtain a bearer token from the secure credential store.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No entry exists for the configured service name.
    #[error(
        "Credential entry '{service}' not found (entry not found). \
         Make sure Claude Code is installed and logged in."
    )]
    NotFound {
        /// Service name that was looked up.
        service: String,
    },

    /// The entry exists but is not the expected JSON document.
    #[error("Unexpected format of credential entry (malformed credential): {0}")]
    Malformed(String),

    /// The access token field is present but empty.
    #[error("accessToken is empty (empty token).")]
    EmptyToken,

    /// The secure store could not be queried at all.
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// Fetch Error
// ============================================================================

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Upstream rejected the credential (HTTP 401/403).
    AuthExpired,
    /// Upstream answered with another failure, or with an unparsable body.
    UpstreamError,
    /// The request never completed (connect, DNS, timeout).
    NetworkError,
}

/// Failure of the upstream usage call.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Credential expired or invalid.
    #[error("Token expired or invalid (HTTP {status}). Please log in to Claude Code again.")]
    AuthExpired {
        /// HTTP status code (401 or 403).
        status: u16,
    },

    /// Non-2xx response other than 401/403.
    #[error("Anthropic API error HTTP {status}: {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// 2xx response whose body is not valid JSON.
    #[error("Anthropic API error: malformed response body: {0}")]
    MalformedBody(String),

    /// Connection, DNS, or timeout failure.
    #[error("Network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::AuthExpired { .. } => FetchErrorKind::AuthExpired,
            Self::Upstream { .. } | Self::MalformedBody(_) => FetchErrorKind::UpstreamError,
            Self::Network(_) => FetchErrorKind::NetworkError,
        }
    }

    /// Returns true if the user has to re-authenticate.
    pub fn requires_reauth(&self) -> bool {
        self.kind() == FetchErrorKind::AuthExpired
    }
}

// ============================================================================
// Service Error
// ============================================================================

/// Which component a [`ServiceError`] originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credential lookup failed.
    Credential,
    /// Upstream fetch failed.
    Fetch,
}

/// Error returned by the usage service. Messages are passed through unchanged.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Credential lookup failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Upstream fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ServiceError {
    /// Returns which component failed.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Credential(_) => ErrorKind::Credential,
            Self::Fetch(_) => ErrorKind::Fetch,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kinds() {
        assert_eq!(
            FetchError::AuthExpired { status: 401 }.kind(),
            FetchErrorKind::AuthExpired
        );
        assert_eq!(
            FetchError::Upstream {
                status: 500,
                body: String::new()
            }
            .kind(),
            FetchErrorKind::UpstreamError
        );
        assert_eq!(
            FetchError::MalformedBody("eof".to_string()).kind(),
            FetchErrorKind::UpstreamError
        );
        assert_eq!(
            FetchError::Network("refused".to_string()).kind(),
            FetchErrorKind::NetworkError
        );
    }

    #[test]
    fn test_auth_expired_message_asks_for_login() {
        let err = FetchError::AuthExpired { status: 403 };
        assert!(err.requires_reauth());
        let msg = err.to_string();
        assert!(msg.contains("HTTP 403"));
        assert!(msg.contains("log in"));
    }

    #[test]
    fn test_upstream_message_includes_status_and_body() {
        let err = FetchError::Upstream {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Anthropic API error HTTP 502: bad gateway");
    }

    #[test]
    fn test_service_error_preserves_message() {
        let inner = CredentialError::Malformed("missing field `accessToken`".to_string());
        let expected = inner.to_string();
        let err = ServiceError::from(inner);
        assert_eq!(err.kind(), ErrorKind::Credential);
        assert_eq!(err.to_string(), expected);
        assert!(expected.contains("malformed"));

        let err = ServiceError::from(FetchError::Network("timed out".to_string()));
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert_eq!(err.to_string(), "Network error: timed out");
    }

    #[test]
    fn test_not_found_names_entry() {
        let err = CredentialError::NotFound {
            service: "Claude Code-credentials".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'Claude Code-credentials'"));
        assert!(msg.contains("not found"));
    }
}
