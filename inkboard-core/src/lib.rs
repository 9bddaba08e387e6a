//! inkboard core - data model
//!
//! Pure data structures shared by every other crate: the normalized
//! per-source payloads, the renderable screen record, and the static
//! source configuration. No I/O lives here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod icons;

pub use config::{
    CryptoBackend, CryptoSettings, CurrencySettings, SourceConfig, TickerConfig, WeatherSettings,
};
pub use error::{ConfigError, FetchError, TickerError, TickerResult};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

// ============================================================================
// SOURCE IDENTITY
// ============================================================================

/// Discriminator for the configured data sources.
///
/// Doubles as the cache key and the screen id, so each source owns exactly
/// one cache entry and one slot in the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Weather,
    Currency,
    Crypto,
}

impl SourceKind {
    /// Stable lowercase identifier, used for cache keys, screen ids and
    /// the `SCREEN_ORDER` / `CACHE_PER_SCREEN` environment tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Currency => "currency",
            Self::Crypto => "crypto",
        }
    }

    /// Parse a source identifier as it appears in configuration tables.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "weather" => Some(Self::Weather),
            "currency" => Some(Self::Currency),
            "crypto" => Some(Self::Crypto),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// NORMALIZED PAYLOADS
// ============================================================================

/// Normalized weather observation.
///
/// Temperatures and wind speed are rounded to one decimal place at
/// normalization time; the condition code stays in the upstream day/night
/// vocabulary (`01d`, `10n`, ...) so the icon map can resolve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Human-readable locality label, e.g. `"Vienna, AT"`.
    pub location: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    /// Day/night-qualified condition code, or [`icons::UNKNOWN_CONDITION`].
    pub condition_code: String,
    /// Title-cased condition description, e.g. `"Light Rain"`.
    pub description: String,
    pub humidity: i64,
    pub pressure_hpa: i64,
    pub wind_speed: f64,
}

/// One quoted pair on a rate board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePair {
    /// Pair symbol in `QUOTE/BASE` orientation, e.g. `"USD/BRL"`, `"BTC/EUR"`.
    pub symbol: String,
    pub rate: f64,
    /// 24h change in percent, when the upstream API provides it.
    pub change_24h: Option<f64>,
}

/// Normalized set of exchange rates (fiat or crypto).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBoard {
    /// Upstream API the rates came from, e.g. `"CoinGecko"`.
    pub provider: String,
    pub pairs: Vec<RatePair>,
}

/// Normalized, source-specific payload. Immutable once constructed; owned
/// by the cache entry that currently holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScreenData {
    Weather(WeatherReport),
    Rates(RateBoard),
}

// ============================================================================
// RENDERABLE SCREEN
// ============================================================================

/// One renderable unit of display content.
///
/// Constructed fresh on every orchestration cycle, never persisted. Its
/// content always traces to exactly one cache entry or one fetch-failure
/// placeholder, never a blend of sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub id: String,
    pub title: String,
    pub lines: Vec<String>,
    /// Presentation asset to draw next to the text, when the source has one.
    pub icon_asset: Option<String>,
    /// True when the content was served from an expired cache entry because
    /// the refresh attempt failed (stale fallback).
    pub is_stale: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_round_trips_through_parse() {
        for kind in [SourceKind::Weather, SourceKind::Currency, SourceKind::Crypto] {
            assert_eq!(SourceKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn source_kind_parse_is_case_and_whitespace_tolerant() {
        assert_eq!(SourceKind::parse(" Weather "), Some(SourceKind::Weather));
        assert_eq!(SourceKind::parse("CRYPTO"), Some(SourceKind::Crypto));
        assert_eq!(SourceKind::parse("stocks"), None);
    }

    #[test]
    fn screen_data_serde_round_trip() {
        let data = ScreenData::Rates(RateBoard {
            provider: "CoinGecko".to_string(),
            pairs: vec![RatePair {
                symbol: "BTC/USD".to_string(),
                rate: 43250.12,
                change_24h: Some(1.25),
            }],
        });
        let json = serde_json::to_string(&data).unwrap();
        let back: ScreenData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
