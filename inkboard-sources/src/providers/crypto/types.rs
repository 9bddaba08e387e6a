//! Crypto backend response types (CoinGecko, CoinMarketCap, Binance)

use serde::Deserialize;
use std::collections::HashMap;

/// CoinGecko `/simple/price` response.
#[derive(Debug, Deserialize)]
pub struct SimplePriceResponse {
    #[serde(default)]
    pub bitcoin: Option<BitcoinQuote>,
}

#[derive(Debug, Deserialize)]
pub struct BitcoinQuote {
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde(default)]
    pub eur: Option<f64>,
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
    #[serde(default)]
    pub eur_24h_change: Option<f64>,
}

/// CoinMarketCap `/cryptocurrency/quotes/latest` response.
#[derive(Debug, Deserialize)]
pub struct CmcResponse {
    pub data: HashMap<String, CmcAsset>,
}

#[derive(Debug, Deserialize)]
pub struct CmcAsset {
    pub quote: HashMap<String, CmcQuote>,
}

#[derive(Debug, Deserialize)]
pub struct CmcQuote {
    pub price: f64,
}

/// Binance `/ticker/price` response; the price comes back as a string.
#[derive(Debug, Deserialize)]
pub struct TickerPrice {
    pub price: String,
}
