//! The in-memory store and its get-or-fetch contract.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use inkboard_core::{TickerResult, Timestamp};
use tracing::{debug, warn};

use crate::freshness::CachedValue;

/// Fetcher invoked on a cache miss or an expired entry.
///
/// One attempt per call; retries and backoff are deliberately not this
/// layer's concern, the stale fallback covers transient outages.
#[async_trait]
pub trait SourceFetcher<T>: Send + Sync {
    async fn fetch(&self) -> TickerResult<T>;
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: Timestamp,
    ttl: Duration,
}

impl<T> CacheEntry<T> {
    fn age(&self, now: Timestamp) -> Duration {
        now.signed_duration_since(self.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    fn is_expired(&self, now: Timestamp) -> bool {
        self.age(now) > self.ttl
    }
}

/// Cache statistics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub expired_entries: usize,
}

/// In-memory TTL store, one live entry per key (overwrite semantics).
///
/// TTL policy is per-call: each screen declares its own refresh cadence at
/// fetch time and the store knows nothing about source semantics. Staleness
/// is checked lazily at read time; there is no background sweeper. The
/// store never performs I/O of its own and a failed fetch never corrupts a
/// previously good entry.
///
/// The `RwLock` exists so the store can be shared by `&self`; it is never
/// held across an await point, so per-key single-flight can be added
/// locally if concurrent polling ever arrives.
pub struct CacheStore<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> CacheStore<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Serve `key` from cache or refresh it through `fetcher`.
    ///
    /// - An entry no older than `ttl` is returned fresh, with no external
    ///   call.
    /// - Otherwise the fetcher runs once. Success overwrites the entry and
    ///   returns it fresh.
    /// - On failure, any previous entry (however old) is returned marked
    ///   stale; with no previous entry the error propagates.
    pub async fn get_or_fetch<F>(
        &self,
        key: &str,
        ttl: Duration,
        fetcher: &F,
    ) -> TickerResult<CachedValue<T>>
    where
        F: SourceFetcher<T> + ?Sized,
    {
        let now = Utc::now();

        if let Some(entry) = self.lookup(key) {
            if entry.age(now) <= ttl {
                debug!(key, "Cache hit");
                return Ok(CachedValue::fresh(entry.value, entry.fetched_at));
            }
            debug!(key, "Cache entry expired");
        } else {
            debug!(key, "Cache miss");
        }

        match fetcher.fetch().await {
            Ok(value) => {
                let fetched_at = Utc::now();
                self.write().insert(
                    key.to_string(),
                    CacheEntry {
                        value: value.clone(),
                        fetched_at,
                        ttl,
                    },
                );
                debug!(key, ttl_secs = ttl.as_secs(), "Cached fresh value");
                Ok(CachedValue::fresh(value, fetched_at))
            }
            Err(err) => match self.lookup(key) {
                Some(entry) => {
                    warn!(key, error = %err, "Fetch failed, serving stale cache entry");
                    Ok(CachedValue::stale(entry.value, entry.fetched_at))
                }
                None => Err(err),
            },
        }
    }

    /// Remove an entry immediately (manual refresh path).
    pub fn invalidate(&self, key: &str) {
        if self.write().remove(key).is_some() {
            debug!(key, "Cache invalidated");
        }
    }

    /// Remove all entries.
    pub fn clear(&self) {
        let mut entries = self.write();
        let removed = entries.len();
        entries.clear();
        debug!(removed, "Cache cleared");
    }

    /// Remove entries past their TTL, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "Cleaned up expired cache entries");
        }
        removed
    }

    /// Snapshot of entry counts by freshness.
    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let entries = self.read();
        let expired = entries.values().filter(|e| e.is_expired(now)).count();
        CacheStats {
            total_entries: entries.len(),
            fresh_entries: entries.len() - expired,
            expired_entries: expired,
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Shift an entry's fetch time into the past, simulating elapsed time.
    #[cfg(any(test, feature = "testing"))]
    pub fn backdate(&self, key: &str, age: Duration) {
        if let Some(entry) = self.write().get_mut(key) {
            entry.fetched_at -= chrono::Duration::from_std(age).unwrap_or_default();
        }
    }

    fn lookup(&self, key: &str) -> Option<CacheEntry<T>> {
        self.read().get(key).cloned()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry<T>>> {
        match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry<T>>> {
        match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<T: Clone> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
