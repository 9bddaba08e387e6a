//! inkboard cache - TTL key-value store with stale fallback
//!
//! Every data source goes through this store: an unexpired entry is served
//! without an external call, an expired or missing entry triggers the
//! supplied fetcher, and a failed refresh falls back to the previous value
//! when one exists. Entries are independent and keyed per source, so a hung
//! upstream never corrupts another screen's data.

mod freshness;
mod store;

pub use freshness::CachedValue;
pub use store::{CacheStats, CacheStore, SourceFetcher};
