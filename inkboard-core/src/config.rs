//! Configuration types
//!
//! The whole configuration is read from the environment exactly once at
//! startup and passed by reference afterwards; no component re-reads
//! ambient environment state after init.

use crate::error::{ConfigError, TickerResult};
use crate::SourceKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Fallback TTL when `CACHE_PER_SCREEN` has no entry for a source.
pub const DEFAULT_TTL_SECS: u64 = 60;

/// Default display tick interval.
pub const DEFAULT_REFRESH_SECS: u64 = 10;

/// Default rotation when `SCREEN_ORDER` is unset.
pub const DEFAULT_SCREEN_ORDER: &str = "weather,currency,crypto";

/// OpenWeatherMap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSettings {
    pub api_key: String,
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// freecurrencyapi settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySettings {
    pub api_key: String,
    /// Currency the pairs are quoted against, e.g. `BRL` for `USD/BRL`.
    pub base_currency: String,
    pub targets: Vec<String>,
}

/// Crypto price backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CryptoBackend {
    CoinGecko,
    CoinMarketCap,
    Binance,
}

impl CryptoBackend {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "coingecko" => Some(Self::CoinGecko),
            "coinmarketcap" => Some(Self::CoinMarketCap),
            "binance" => Some(Self::Binance),
            _ => None,
        }
    }
}

/// Crypto price settings. CoinGecko and Binance work without a key, so this
/// source is always available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoSettings {
    pub coingecko_api_key: Option<String>,
    pub coinmarketcap_api_key: Option<String>,
    pub preferred: CryptoBackend,
}

/// Static per-screen configuration. Read-only for the lifetime of the
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub enabled: bool,
    /// Maximum age before this screen's cached value is considered stale.
    pub ttl: Duration,
    /// Slot in the rotation; lower positions render first.
    pub ordering_position: u32,
}

/// Master configuration struct, constructed once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Screens in rotation order, including disabled ones (the orchestrator
    /// filters those out when it builds the rotation).
    pub screens: Vec<SourceConfig>,
    pub weather: Option<WeatherSettings>,
    pub currency: Option<CurrencySettings>,
    pub crypto: CryptoSettings,
    pub default_ttl: Duration,
    /// How long the driver waits between display ticks.
    pub refresh_interval: Duration,
    /// When set, frames are written to this path instead of the log.
    pub frame_file: Option<PathBuf>,
}

impl TickerConfig {
    /// Build the configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SCREEN_ORDER`: comma-separated source names (default:
    ///   `weather,currency,crypto`)
    /// - `CACHE_PER_SCREEN`: `source:ttl_seconds` comma pairs
    /// - `CACHE_DEFAULT_TTL`: fallback TTL in seconds (default: 60)
    /// - `TICKER_REFRESH_SECS`: display tick interval (default: 10)
    /// - `OPEN_WEATHER_API_KEY`, `OPEN_WEATHER_CITY`, `OPEN_WEATHER_STATE`,
    ///   `OPEN_WEATHER_COUNTRY`
    /// - `FREE_CURRENCY_API_KEY`, `CURRENCY_BASE` (default: `BRL`),
    ///   `CURRENCY_TARGETS` (default: `USD,EUR`)
    /// - `COINGECKO_API_KEY`, `COINMARKETCAP_API_KEY`,
    ///   `CRYPTO_PREFERRED_SOURCE` (default: `coingecko`)
    /// - `TICKER_FRAME_FILE`: optional path for text frame output
    ///
    /// An enabled screen whose source is missing a required key is logged
    /// and disabled for the run rather than failing startup.
    pub fn from_env() -> Self {
        let default_ttl = env_secs("CACHE_DEFAULT_TTL", DEFAULT_TTL_SECS);
        let refresh_interval = env_secs("TICKER_REFRESH_SECS", DEFAULT_REFRESH_SECS);

        let order_raw =
            env_opt("SCREEN_ORDER").unwrap_or_else(|| DEFAULT_SCREEN_ORDER.to_string());
        let order = parse_screen_order(&order_raw);

        let ttl_raw = env_opt("CACHE_PER_SCREEN").unwrap_or_default();
        let ttl_table = parse_ttl_table(&ttl_raw);

        let weather = match (env_opt("OPEN_WEATHER_API_KEY"), env_opt("OPEN_WEATHER_CITY")) {
            (Some(api_key), Some(city)) => Some(WeatherSettings {
                api_key,
                city,
                state: env_opt("OPEN_WEATHER_STATE"),
                country: env_opt("OPEN_WEATHER_COUNTRY"),
            }),
            _ => None,
        };

        let currency = env_opt("FREE_CURRENCY_API_KEY").map(|api_key| CurrencySettings {
            api_key,
            base_currency: env_opt("CURRENCY_BASE").unwrap_or_else(|| "BRL".to_string()),
            targets: env_opt("CURRENCY_TARGETS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_ascii_uppercase())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec!["USD".to_string(), "EUR".to_string()]),
        });

        let crypto = CryptoSettings {
            coingecko_api_key: env_opt("COINGECKO_API_KEY"),
            coinmarketcap_api_key: env_opt("COINMARKETCAP_API_KEY"),
            preferred: env_opt("CRYPTO_PREFERRED_SOURCE")
                .and_then(|raw| {
                    let parsed = CryptoBackend::parse(&raw);
                    if parsed.is_none() {
                        warn!(value = %raw, "Unknown CRYPTO_PREFERRED_SOURCE, using coingecko");
                    }
                    parsed
                })
                .unwrap_or(CryptoBackend::CoinGecko),
        };

        let screens =
            build_screens(&order, &ttl_table, default_ttl, weather.is_some(), currency.is_some());

        Self {
            screens,
            weather,
            currency,
            crypto,
            default_ttl: Duration::from_secs(default_ttl),
            refresh_interval: Duration::from_secs(refresh_interval),
            frame_file: env_opt("TICKER_FRAME_FILE").map(PathBuf::from),
        }
    }

    /// Validate the configuration.
    ///
    /// Validates that every screen TTL, the default TTL and the refresh
    /// interval are positive.
    pub fn validate(&self) -> TickerResult<()> {
        if self.default_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "CACHE_DEFAULT_TTL".to_string(),
                value: "0".to_string(),
                reason: "default TTL must be positive".to_string(),
            }
            .into());
        }

        if self.refresh_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "TICKER_REFRESH_SECS".to_string(),
                value: "0".to_string(),
                reason: "refresh interval must be positive".to_string(),
            }
            .into());
        }

        for screen in &self.screens {
            if screen.ttl.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: format!("CACHE_PER_SCREEN[{}]", screen.kind),
                    value: "0".to_string(),
                    reason: "screen TTL must be positive".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Parse the `SCREEN_ORDER` list. Unknown names are logged and skipped,
/// duplicates keep their first position.
pub fn parse_screen_order(raw: &str) -> Vec<SourceKind> {
    let mut order = Vec::new();
    for item in raw.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        match SourceKind::parse(item) {
            Some(kind) if order.contains(&kind) => {
                warn!(source = %kind, "Duplicate entry in SCREEN_ORDER, keeping first");
            }
            Some(kind) => order.push(kind),
            None => warn!(name = item, "Unknown source in SCREEN_ORDER, skipping"),
        }
    }
    order
}

/// Parse the `CACHE_PER_SCREEN` TTL table (`source:ttl_seconds` comma
/// pairs). Malformed items are logged and skipped.
pub fn parse_ttl_table(raw: &str) -> HashMap<SourceKind, u64> {
    let mut table = HashMap::new();
    for item in raw.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let Some((name, ttl_str)) = item.split_once(':') else {
            warn!(item, "Malformed CACHE_PER_SCREEN entry, skipping");
            continue;
        };
        let Some(kind) = SourceKind::parse(name) else {
            warn!(item, "Unknown source in CACHE_PER_SCREEN, skipping");
            continue;
        };
        match ttl_str.trim().parse::<u64>() {
            Ok(secs) => {
                table.insert(kind, secs);
            }
            Err(_) => warn!(item, "Invalid TTL in CACHE_PER_SCREEN, skipping"),
        }
    }
    table
}

fn build_screens(
    order: &[SourceKind],
    ttl_table: &HashMap<SourceKind, u64>,
    default_ttl: u64,
    weather_configured: bool,
    currency_configured: bool,
) -> Vec<SourceConfig> {
    order
        .iter()
        .enumerate()
        .map(|(position, &kind)| {
            let enabled = match kind {
                SourceKind::Weather => weather_configured,
                SourceKind::Currency => currency_configured,
                SourceKind::Crypto => true,
            };
            if !enabled {
                warn!(source = %kind, "Source not configured, disabled for this run");
            }
            SourceConfig {
                kind,
                enabled,
                ttl: Duration::from_secs(*ttl_table.get(&kind).unwrap_or(&default_ttl)),
                ordering_position: position as u32,
            }
        })
        .collect()
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_secs(name: &str, default: u64) -> u64 {
    env_opt(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
