//! Freshness metadata for cache reads.
//!
//! Every read out of the store carries whether the value satisfied its TTL
//! or was served as a stale fallback, so the orchestrator can surface
//! staleness on the rendered screen instead of hiding it.

use chrono::Utc;
use inkboard_core::Timestamp;
use std::time::Duration;

/// A cached value together with its freshness metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedValue<T> {
    value: T,
    fetched_at: Timestamp,
    is_fresh: bool,
}

impl<T> CachedValue<T> {
    /// A value that satisfied its TTL (or was just fetched).
    pub fn fresh(value: T, fetched_at: Timestamp) -> Self {
        Self {
            value,
            fetched_at,
            is_fresh: true,
        }
    }

    /// An expired value served because the refresh attempt failed.
    pub fn stale(value: T, fetched_at: Timestamp) -> Self {
        Self {
            value,
            fetched_at,
            is_fresh: false,
        }
    }

    /// Consume the wrapper and return the underlying value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Get a reference to the underlying value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// False when this value was served past its TTL (stale fallback).
    pub fn is_fresh(&self) -> bool {
        self.is_fresh
    }

    /// When the value was fetched from upstream.
    pub fn fetched_at(&self) -> Timestamp {
        self.fetched_at
    }

    /// Time elapsed since the value was fetched.
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_read() {
        let fetched_at = Utc::now();
        let read = CachedValue::fresh(42i32, fetched_at);
        assert!(read.is_fresh());
        assert_eq!(read.fetched_at(), fetched_at);
        assert_eq!(read.into_value(), 42);
    }

    #[test]
    fn test_stale_read() {
        let read = CachedValue::stale("v".to_string(), Utc::now());
        assert!(!read.is_fresh());
        assert_eq!(read.value(), "v");
    }

    #[test]
    fn test_age_of_backdated_value() {
        let past = Utc::now() - chrono::Duration::seconds(5);
        let read = CachedValue::fresh((), past);
        assert!(read.age() >= Duration::from_secs(4));
        assert!(read.age() <= Duration::from_secs(10));
    }
}
