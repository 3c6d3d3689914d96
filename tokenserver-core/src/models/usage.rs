//! Usage-related types.
//!
//! - [`UsagePayload`] - Upstream document, opaque to this system
//! - [`UsageSnapshot`] - The single cached payload with its fetch times
//! - [`UsageResult`] - Response envelope served to clients

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Usage document as returned by the upstream API.
///
/// No schema is imposed; the document is passed through unmodified.
pub type UsagePayload = serde_json::Value;

// ============================================================================
// Usage Snapshot
// ============================================================================

/// The most recently fetched payload and when it was fetched.
///
/// `fetched_at` is monotonic and drives staleness. `fetched_at_wall` is only
/// for display and never takes part in TTL decisions.
#[derive(Debug, Clone)]
pub struct UsageSnapshot {
    /// Upstream payload.
    pub payload: UsagePayload,
    /// Monotonic fetch time.
    pub fetched_at: Instant,
    /// Wall-clock fetch time (UTC).
    pub fetched_at_wall: DateTime<Utc>,
}

impl UsageSnapshot {
    /// Creates a snapshot from a freshly fetched payload.
    pub fn new(payload: UsagePayload, fetched_at: Instant, fetched_at_wall: DateTime<Utc>) -> Self {
        Self {
            payload,
            fetched_at,
            fetched_at_wall,
        }
    }

    /// Time elapsed since the fetch, measured on the monotonic clock.
    ///
    /// Saturates to zero if `now` is earlier than the fetch instant.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.fetched_at)
    }

    /// Age rounded to the nearest whole second; exact halves go to the even
    /// second.
    pub fn age_secs(&self, now: Instant) -> u64 {
        const HALF: u32 = 500_000_000;
        let age = self.age(now);
        let secs = age.as_secs();
        match age.subsec_nanos().cmp(&HALF) {
            std::cmp::Ordering::Less => secs,
            std::cmp::Ordering::Greater => secs + 1,
            std::cmp::Ordering::Equal => secs + secs % 2,
        }
    }
}

// ============================================================================
// Usage Result
// ============================================================================

/// Response envelope for `/usage` and `/usage/fresh`.
///
/// `cache_age_seconds` is 0 whenever `cached` is false, and `fetched_at`
/// always belongs to the snapshot carried in `usage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageResult {
    /// Whether the payload came from the cache.
    pub cached: bool,
    /// Seconds since the payload was fetched.
    pub cache_age_seconds: u64,
    /// When the payload was fetched (ISO-8601, UTC).
    #[serde(with = "iso8601")]
    pub fetched_at: DateTime<Utc>,
    /// The upstream payload.
    pub usage: UsagePayload,
}

impl UsageResult {
    /// Envelope for a payload that was just fetched.
    pub fn fresh(snapshot: &UsageSnapshot) -> Self {
        Self {
            cached: false,
            cache_age_seconds: 0,
            fetched_at: snapshot.fetched_at_wall,
            usage: snapshot.payload.clone(),
        }
    }

    /// Envelope for a payload served from the cache at `now`.
    pub fn from_cache(snapshot: &UsageSnapshot, now: Instant) -> Self {
        Self {
            cached: true,
            cache_age_seconds: snapshot.age_secs(now),
            fetched_at: snapshot.fetched_at_wall,
            usage: snapshot.payload.clone(),
        }
    }
}

/// Serializes timestamps as `2025-01-01T12:00:00.123456+00:00`.
mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, false))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
