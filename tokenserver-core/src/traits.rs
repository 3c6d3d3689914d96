//! Trait definitions for `TokenServer`.
//!
//! These are the seams between the usage service and the outside world. The
//! production implementations live in `tokenserver-fetch` and
//! `tokenserver-store`; tests swap in fakes.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{CredentialError, FetchError};
use crate::models::{Token, UsagePayload};

/// Reads the current bearer token from a secure credential store.
///
/// Implementations hold no state between calls; every call queries the store.
#[async_trait]
pub trait CredentialReader: Send + Sync {
    /// Returns the current token.
    async fn read_token(&self) -> Result<Token, CredentialError>;
}

/// Performs the upstream usage call.
#[async_trait]
pub trait UsageFetcher: Send + Sync {
    /// Fetches the usage document with the given token.
    ///
    /// Exactly one request is attempted; failures are not retried.
    async fn fetch_usage(&self, token: &Token) -> Result<UsagePayload, FetchError>;
}

/// Source of time.
///
/// The two readings are independent: staleness uses [`Clock::now`] only, and
/// [`Clock::wall_now`] is captured for display.
pub trait Clock: Send + Sync {
    /// Monotonic time.
    fn now(&self) -> Instant;

    /// Wall-clock time in UTC.
    fn wall_now(&self) -> DateTime<Utc>;
}
