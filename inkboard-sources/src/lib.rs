//! inkboard sources - upstream API clients
//!
//! One client per external data source, all behind the [`DataSource`]
//! capability trait so the orchestrator never depends on a concrete source
//! type. Each fetch is a single attempt with a bounded timeout; recovery
//! lives in the cache layer.

use async_trait::async_trait;
use inkboard_cache::SourceFetcher;
use inkboard_core::{ScreenData, SourceKind, TickerResult};

pub mod providers;

pub use providers::crypto::CryptoSource;
pub use providers::currency::CurrencySource;
pub use providers::weather::WeatherSource;

/// A pollable external data source.
///
/// Implementations must be thread-safe (Send + Sync). `fetch` performs one
/// request, validates the payload shape, and normalizes it into a
/// [`ScreenData`] record; structurally valid but semantically empty values
/// become defined sentinels rather than errors.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Which screen this source feeds; doubles as its cache key.
    fn kind(&self) -> SourceKind;

    /// Fetch and normalize the current upstream value.
    ///
    /// # Returns
    /// * `Ok(ScreenData)` - normalized payload
    /// * `Err(TickerError::Fetch)` - network unreachable, non-2xx response,
    ///   or schema-invalid body
    async fn fetch(&self) -> TickerResult<ScreenData>;
}

// A boxed data source can feed the cache directly.
#[async_trait]
impl SourceFetcher<ScreenData> for dyn DataSource {
    async fn fetch(&self) -> TickerResult<ScreenData> {
        DataSource::fetch(self).await
    }
}
