//! Cache-coordinated usage service.
//!
//! For every request the service either answers from the cache or reads a
//! fresh token and fetches from upstream. A failed fetch leaves the cache
//! exactly as it was and is reported to the caller; stale data is never
//! served in place of an error.
//!
//! ## Concurrency
//!
//! The cache slot sits behind a `std::sync::Mutex` that is only held for the
//! freshness check plus copy, or for the store. It is never held across an
//! `.await`, so the credential read and the network call run unlocked.
//! Concurrent misses each fetch independently and the last one to finish
//! wins the slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokenserver_core::{
    Clock, CredentialReader, ServiceError, UsageFetcher, UsageResult, UsageSnapshot,
};
use tracing::{debug, info, instrument, warn};

use crate::cache::{UsageCache, DEFAULT_TTL};
use crate::clock::SystemClock;

// ============================================================================
// Usage Service
// ============================================================================

/// Decides between serving the cached snapshot and fetching a new one.
pub struct UsageService {
    cache: Mutex<UsageCache>,
    credentials: Arc<dyn CredentialReader>,
    fetcher: Arc<dyn UsageFetcher>,
    clock: Arc<dyn Clock>,
}

impl UsageService {
    /// Creates a service with the system clock and the default TTL.
    pub fn new(credentials: Arc<dyn CredentialReader>, fetcher: Arc<dyn UsageFetcher>) -> Self {
        Self {
            cache: Mutex::new(UsageCache::new(DEFAULT_TTL)),
            credentials,
            fetcher,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the cache TTL. Any stored snapshot is kept.
    pub fn with_ttl(self, ttl: Duration) -> Self {
        let snapshot = self.lock_cache().get().cloned();
        let mut cache = UsageCache::new(ttl);
        if let Some(s) = snapshot {
            cache.put(s.payload, s.fetched_at, s.fetched_at_wall);
        }
        Self {
            cache: Mutex::new(cache),
            ..self
        }
    }

    /// Returns the cache TTL.
    pub fn ttl(&self) -> Duration {
        self.lock_cache().ttl()
    }

    /// Returns a copy of the stored snapshot, fresh or not.
    pub fn snapshot(&self) -> Option<UsageSnapshot> {
        self.lock_cache().get().cloned()
    }

    /// Returns usage data, from the cache when possible.
    ///
    /// With `force_refresh` the cache is bypassed and exactly one upstream
    /// fetch is attempted.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Credential`] if no token could be read; nothing was
    ///   fetched
    /// - [`ServiceError::Fetch`] if the upstream call failed
    ///
    /// In both cases the cache is untouched.
    #[instrument(skip(self))]
    pub async fn get_usage(&self, force_refresh: bool) -> Result<UsageResult, ServiceError> {
        let now = self.clock.now();

        if !force_refresh {
            let cache = self.lock_cache();
            if let Some(snapshot) = cache.get_fresh(now) {
                let result = UsageResult::from_cache(snapshot, now);
                debug!(age_secs = result.cache_age_seconds, "Serving cached usage");
                return Ok(result);
            }
        }

        debug!("Cache miss, fetching usage");

        let token = self.credentials.read_token().await.map_err(|e| {
            warn!(error = %e, "Credential lookup failed");
            ServiceError::from(e)
        })?;

        let payload = self.fetcher.fetch_usage(&token).await.map_err(|e| {
            if e.requires_reauth() {
                warn!(error = %e, "Usage API rejected the token; re-login required");
            } else {
                warn!(error = %e, kind = ?e.kind(), "Usage fetch failed");
            }
            ServiceError::from(e)
        })?;
        drop(token);

        let snapshot = UsageSnapshot::new(payload, now, self.clock.wall_now());
        let result = UsageResult::fresh(&snapshot);
        self.lock_cache()
            .put(snapshot.payload, snapshot.fetched_at, snapshot.fetched_at_wall);

        info!(fetched_at = %result.fetched_at, forced = force_refresh, "Fetched fresh usage");
        Ok(result)
    }

    fn lock_cache(&self) -> MutexGuard<'_, UsageCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for UsageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokenserver_core::{CredentialError, ErrorKind, FetchError, Token, UsagePayload};

    struct StaticReader;

    #[async_trait]
    impl CredentialReader for StaticReader {
        async fn read_token(&self) -> Result<Token, CredentialError> {
            Ok(Token::new("t"))
        }
    }

    struct CountingFetcher(AtomicUsize);

    #[async_trait]
    impl UsageFetcher for CountingFetcher {
        async fn fetch_usage(&self, _token: &Token) -> Result<UsagePayload, FetchError> {
            let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(json!({ "call": n }))
        }
    }

    fn service() -> (UsageService, Arc<CountingFetcher>, Arc<ManualClock>) {
        let fetcher = Arc::new(CountingFetcher(AtomicUsize::new(0)));
        let clock = Arc::new(ManualClock::default());
        let service = UsageService::new(Arc::new(StaticReader), fetcher.clone())
            .with_clock(clock.clone());
        (service, fetcher, clock)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let (service, fetcher, clock) = service();

        let first = service.get_usage(false).await.unwrap();
        assert!(!first.cached);
        assert_eq!(first.cache_age_seconds, 0);

        clock.advance(Duration::from_secs(3));
        let second = service.get_usage(false).await.unwrap();
        assert!(second.cached);
        assert_eq!(second.cache_age_seconds, 3);
        assert_eq!(second.usage, first.usage);
        assert_eq!(second.fetched_at, first.fetched_at);
        assert_eq!(fetcher.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_ttl_keeps_snapshot() {
        let (service, _, _) = service();
        service.get_usage(false).await.unwrap();

        let service = service.with_ttl(Duration::from_secs(10));
        assert_eq!(service.ttl(), Duration::from_secs(10));
        assert!(service.snapshot().is_some());
        assert!(service.get_usage(false).await.unwrap().cached);
    }

    #[tokio::test]
    async fn test_error_kind_is_credential() {
        struct Missing;

        #[async_trait]
        impl CredentialReader for Missing {
            async fn read_token(&self) -> Result<Token, CredentialError> {
                Err(CredentialError::NotFound {
                    service: "svc".to_string(),
                })
            }
        }

        let fetcher = Arc::new(CountingFetcher(AtomicUsize::new(0)));
        let service = UsageService::new(Arc::new(Missing), fetcher.clone());
        let err = service.get_usage(false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Credential);
        assert_eq!(fetcher.0.load(Ordering::SeqCst), 0);
    }
}
