//! Single-slot usage cache.
//!
//! Holds at most one [`UsageSnapshot`]. Staleness is judged on the monotonic
//! clock only; the wall-clock timestamp stored alongside is for display.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokenserver_core::{UsagePayload, UsageSnapshot};
use tracing::trace;

/// Default time-to-live (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache for the most recent successful usage fetch.
#[derive(Debug)]
pub struct UsageCache {
    snapshot: Option<UsageSnapshot>,
    ttl: Duration,
}

impl UsageCache {
    /// Creates an empty cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            snapshot: None,
            ttl,
        }
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns true if a snapshot exists and is younger than the TTL at `now`.
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.age(now) < self.ttl)
    }

    /// Returns the stored snapshot regardless of freshness.
    pub fn get(&self) -> Option<&UsageSnapshot> {
        self.snapshot.as_ref()
    }

    /// Returns the stored snapshot only if it is fresh at `now`.
    pub fn get_fresh(&self, now: Instant) -> Option<&UsageSnapshot> {
        if self.is_fresh(now) { self.snapshot.as_ref() } else { None }
    }

    /// Replaces any stored snapshot.
    pub fn put(&mut self, payload: UsagePayload, now: Instant, fetched_at_wall: DateTime<Utc>) {
        trace!(replacing = self.snapshot.is_some(), "Storing usage snapshot");
        self.snapshot = Some(UsageSnapshot::new(payload, now, fetched_at_wall));
    }
}

impl Default for UsageCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

// ============================================================================
// Tests
// ============================================================================
