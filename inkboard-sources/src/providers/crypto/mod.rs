//! BTC price client with a backend fallback chain
//!
//! CoinGecko and Binance work without a key, CoinMarketCap needs one. The
//! preferred backend is tried first, then the remaining ones in declaration
//! order; the last error surfaces only if every backend fails.

mod types;

use async_trait::async_trait;
use inkboard_core::{
    CryptoBackend, CryptoSettings, RateBoard, RatePair, ScreenData, SourceKind, TickerError,
    TickerResult,
};
use reqwest::Client;
use tracing::{debug, warn};

use super::{invalid_payload, request_failed, round_to, unreachable, REQUEST_TIMEOUT};
use crate::DataSource;
use types::{CmcResponse, SimplePriceResponse, TickerPrice};

const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const COINMARKETCAP_BASE_URL: &str = "https://pro-api.coinmarketcap.com/v1";
const BINANCE_BASE_URL: &str = "https://api.binance.com/api/v3";

/// Every backend is tried at most once per fetch, in this order after the
/// preferred one.
const BACKEND_ORDER: [CryptoBackend; 3] = [
    CryptoBackend::CoinGecko,
    CryptoBackend::CoinMarketCap,
    CryptoBackend::Binance,
];

/// BTC price source with per-backend fallback.
pub struct CryptoSource {
    client: Client,
    settings: CryptoSettings,
    coingecko_url: String,
    coinmarketcap_url: String,
    binance_url: String,
}

impl CryptoSource {
    pub fn new(settings: CryptoSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            coingecko_url: COINGECKO_BASE_URL.to_string(),
            coinmarketcap_url: COINMARKETCAP_BASE_URL.to_string(),
            binance_url: BINANCE_BASE_URL.to_string(),
        }
    }

    /// Point every backend at the same endpoint (mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.coingecko_url = base_url.clone();
        self.coinmarketcap_url = base_url.clone();
        self.binance_url = base_url;
        self
    }

    /// Preferred backend first, the rest in declaration order.
    fn backend_order(&self) -> Vec<CryptoBackend> {
        let mut order = vec![self.settings.preferred];
        for backend in BACKEND_ORDER {
            if backend != self.settings.preferred {
                order.push(backend);
            }
        }
        order
    }

    async fn fetch_coingecko(&self) -> TickerResult<RateBoard> {
        let mut request = self
            .client
            .get(format!("{}/simple/price", self.coingecko_url))
            .query(&[
                ("ids", "bitcoin"),
                ("vs_currencies", "usd,eur"),
                ("include_24hr_change", "true"),
            ])
            .timeout(REQUEST_TIMEOUT);
        if let Some(key) = &self.settings.coingecko_api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| unreachable(SourceKind::Crypto, &e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(request_failed(SourceKind::Crypto, status.as_u16(), body));
        }

        let payload: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| invalid_payload(SourceKind::Crypto, e.to_string()))?;

        normalize_coingecko(payload)
    }

    async fn fetch_coinmarketcap(&self) -> TickerResult<RateBoard> {
        let Some(api_key) = &self.settings.coinmarketcap_api_key else {
            return Err(invalid_payload(
                SourceKind::Crypto,
                "CoinMarketCap API key not provided",
            ));
        };

        let response = self
            .client
            .get(format!(
                "{}/cryptocurrency/quotes/latest",
                self.coinmarketcap_url
            ))
            .header("X-CMC_PRO_API_KEY", api_key)
            .query(&[("symbol", "BTC"), ("convert", "USD,EUR")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| unreachable(SourceKind::Crypto, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(request_failed(SourceKind::Crypto, status.as_u16(), body));
        }

        let payload: CmcResponse = response
            .json()
            .await
            .map_err(|e| invalid_payload(SourceKind::Crypto, e.to_string()))?;

        normalize_coinmarketcap(payload)
    }

    async fn fetch_binance(&self) -> TickerResult<RateBoard> {
        let usd = self.binance_ticker("BTCUSDT").await?;
        // The EUR pair is thinner; a missing leg is tolerated.
        let eur = match self.binance_ticker("BTCEUR").await {
            Ok(price) => Some(price),
            Err(err) => {
                warn!(error = %err, "Binance BTCEUR leg unavailable");
                None
            }
        };

        let mut pairs = vec![RatePair {
            symbol: "BTC/USD".to_string(),
            rate: round_to(usd, 2),
            change_24h: None,
        }];
        if let Some(eur) = eur {
            pairs.push(RatePair {
                symbol: "BTC/EUR".to_string(),
                rate: round_to(eur, 2),
                change_24h: None,
            });
        }

        Ok(RateBoard {
            provider: "Binance".to_string(),
            pairs,
        })
    }

    async fn binance_ticker(&self, symbol: &str) -> TickerResult<f64> {
        let response = self
            .client
            .get(format!("{}/ticker/price", self.binance_url))
            .query(&[("symbol", symbol)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| unreachable(SourceKind::Crypto, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(request_failed(SourceKind::Crypto, status.as_u16(), body));
        }

        let payload: TickerPrice = response
            .json()
            .await
            .map_err(|e| invalid_payload(SourceKind::Crypto, e.to_string()))?;
        payload.price.parse::<f64>().map_err(|_| {
            invalid_payload(
                SourceKind::Crypto,
                format!("unparseable price for {symbol}: {}", payload.price),
            )
        })
    }
}

#[async_trait]
impl DataSource for CryptoSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Crypto
    }

    async fn fetch(&self) -> TickerResult<ScreenData> {
        let mut last_err: Option<TickerError> = None;
        for backend in self.backend_order() {
            debug!(?backend, "Fetching BTC prices");
            let result = match backend {
                CryptoBackend::CoinGecko => self.fetch_coingecko().await,
                CryptoBackend::CoinMarketCap => self.fetch_coinmarketcap().await,
                CryptoBackend::Binance => self.fetch_binance().await,
            };
            match result {
                Ok(board) => return Ok(ScreenData::Rates(board)),
                Err(err) => {
                    warn!(?backend, error = %err, "Crypto backend failed, trying next");
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            invalid_payload(SourceKind::Crypto, "no crypto backend available")
        }))
    }
}

fn normalize_coingecko(payload: SimplePriceResponse) -> TickerResult<RateBoard> {
    let Some(quote) = payload.bitcoin else {
        return Err(invalid_payload(
            SourceKind::Crypto,
            "no bitcoin data in response",
        ));
    };

    let mut pairs = Vec::new();
    if let Some(usd) = quote.usd {
        pairs.push(RatePair {
            symbol: "BTC/USD".to_string(),
            rate: round_to(usd, 2),
            change_24h: quote.usd_24h_change.map(|c| round_to(c, 2)),
        });
    }
    if let Some(eur) = quote.eur {
        pairs.push(RatePair {
            symbol: "BTC/EUR".to_string(),
            rate: round_to(eur, 2),
            change_24h: quote.eur_24h_change.map(|c| round_to(c, 2)),
        });
    }
    if pairs.is_empty() {
        return Err(invalid_payload(
            SourceKind::Crypto,
            "bitcoin entry carried no prices",
        ));
    }

    Ok(RateBoard {
        provider: "CoinGecko".to_string(),
        pairs,
    })
}

fn normalize_coinmarketcap(payload: CmcResponse) -> TickerResult<RateBoard> {
    let quote = payload
        .data
        .get("BTC")
        .map(|asset| &asset.quote)
        .ok_or_else(|| invalid_payload(SourceKind::Crypto, "no BTC data in response"))?;

    let mut pairs = Vec::new();
    for (currency, symbol) in [("USD", "BTC/USD"), ("EUR", "BTC/EUR")] {
        if let Some(q) = quote.get(currency) {
            pairs.push(RatePair {
                symbol: symbol.to_string(),
                rate: round_to(q.price, 2),
                change_24h: None,
            });
        }
    }
    if pairs.is_empty() {
        return Err(invalid_payload(
            SourceKind::Crypto,
            "BTC entry carried no quotes",
        ));
    }

    Ok(RateBoard {
        provider: "CoinMarketCap".to_string(),
        pairs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(preferred: CryptoBackend) -> CryptoSettings {
        CryptoSettings {
            coingecko_api_key: None,
            coinmarketcap_api_key: None,
            preferred,
        }
    }

    #[test]
    fn test_backend_order_puts_preferred_first() {
        let source = CryptoSource::new(settings(CryptoBackend::Binance));
        assert_eq!(
            source.backend_order(),
            vec![
                CryptoBackend::Binance,
                CryptoBackend::CoinGecko,
                CryptoBackend::CoinMarketCap,
            ]
        );
    }

    #[test]
    fn test_backend_order_default_preference() {
        let source = CryptoSource::new(settings(CryptoBackend::CoinGecko));
        assert_eq!(source.backend_order()[0], CryptoBackend::CoinGecko);
        assert_eq!(source.backend_order().len(), 3);
    }

    #[test]
    fn test_normalize_coingecko_rounds_and_carries_change() {
        let payload: SimplePriceResponse = serde_json::from_value(serde_json::json!({
            "bitcoin": {
                "usd": 43250.1249, "eur": 39800.567,
                "usd_24h_change": 1.2468, "eur_24h_change": -0.874
            }
        }))
        .unwrap();

        let board = normalize_coingecko(payload).unwrap();
        assert_eq!(board.provider, "CoinGecko");
        assert_eq!(board.pairs[0].symbol, "BTC/USD");
        assert_eq!(board.pairs[0].rate, 43250.12);
        assert_eq!(board.pairs[0].change_24h, Some(1.25));
        assert_eq!(board.pairs[1].symbol, "BTC/EUR");
        assert_eq!(board.pairs[1].change_24h, Some(-0.87));
    }

    #[test]
    fn test_normalize_coingecko_partial_quote_keeps_present_pair() {
        let payload: SimplePriceResponse =
            serde_json::from_value(serde_json::json!({"bitcoin": {"usd": 43000.0}})).unwrap();
        let board = normalize_coingecko(payload).unwrap();
        assert_eq!(board.pairs.len(), 1);
        assert_eq!(board.pairs[0].symbol, "BTC/USD");
    }

    #[test]
    fn test_normalize_coingecko_missing_bitcoin_is_invalid() {
        let payload: SimplePriceResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(normalize_coingecko(payload).is_err());
    }

    #[test]
    fn test_normalize_coinmarketcap() {
        let payload: CmcResponse = serde_json::from_value(serde_json::json!({
            "data": {"BTC": {"quote": {
                "USD": {"price": 43250.129},
                "EUR": {"price": 39800.001}
            }}}
        }))
        .unwrap();

        let board = normalize_coinmarketcap(payload).unwrap();
        assert_eq!(board.provider, "CoinMarketCap");
        assert_eq!(board.pairs[0].rate, 43250.13);
        assert_eq!(board.pairs[1].rate, 39800.0);
    }

    #[test]
    fn test_normalize_coinmarketcap_missing_btc_is_invalid() {
        let payload: CmcResponse =
            serde_json::from_value(serde_json::json!({"data": {}})).unwrap();
        assert!(normalize_coinmarketcap(payload).is_err());
    }

    #[test]
    fn test_binance_price_string_parses() {
        let payload: TickerPrice =
            serde_json::from_value(serde_json::json!({"price": "43250.12000000"})).unwrap();
        assert_eq!(payload.price.parse::<f64>().unwrap(), 43250.12);
    }
}
