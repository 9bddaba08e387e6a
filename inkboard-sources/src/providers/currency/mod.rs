//! freecurrencyapi client
//!
//! The API quotes targets against the base (`USD = 0.2` meaning 1 BRL buys
//! 0.2 USD); rates are inverted here into the `TARGET/BASE` orientation the
//! display shows. Fiat rates are kept at source precision, no rounding, to
//! avoid compounding display error.

mod types;

use async_trait::async_trait;
use inkboard_core::{
    CurrencySettings, RateBoard, RatePair, ScreenData, SourceKind, TickerResult,
};
use reqwest::Client;
use tracing::{debug, warn};

use super::{invalid_payload, request_failed, unreachable, REQUEST_TIMEOUT};
use crate::DataSource;
use types::LatestRatesResponse;

const FREECURRENCY_BASE_URL: &str = "https://api.freecurrencyapi.com/v1";

const PROVIDER_NAME: &str = "freecurrencyapi";

/// Fiat exchange-rate source backed by freecurrencyapi.
pub struct CurrencySource {
    client: Client,
    settings: CurrencySettings,
    base_url: String,
}

impl CurrencySource {
    pub fn new(settings: CurrencySettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            base_url: FREECURRENCY_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn normalize(&self, payload: LatestRatesResponse) -> RateBoard {
        let base = &self.settings.base_currency;
        let pairs = self
            .settings
            .targets
            .iter()
            .map(|target| {
                let symbol = format!("{target}/{base}");
                match payload.data.get(target).copied().filter(|r| *r != 0.0) {
                    Some(rate) => RatePair {
                        symbol,
                        rate: 1.0 / rate,
                        change_24h: None,
                    },
                    None => {
                        warn!(target, "No rate data for target currency");
                        RatePair {
                            symbol,
                            rate: 0.0,
                            change_24h: None,
                        }
                    }
                }
            })
            .collect();

        RateBoard {
            provider: PROVIDER_NAME.to_string(),
            pairs,
        }
    }
}

#[async_trait]
impl DataSource for CurrencySource {
    fn kind(&self) -> SourceKind {
        SourceKind::Currency
    }

    async fn fetch(&self) -> TickerResult<ScreenData> {
        debug!(
            base = %self.settings.base_currency,
            targets = ?self.settings.targets,
            "Fetching exchange rates"
        );

        let response = self
            .client
            .get(format!("{}/latest", self.base_url))
            .query(&[
                ("apikey", self.settings.api_key.as_str()),
                ("base_currency", self.settings.base_currency.as_str()),
                ("currencies", self.settings.targets.join(",").as_str()),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| unreachable(SourceKind::Currency, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(request_failed(SourceKind::Currency, status.as_u16(), body));
        }

        let payload: LatestRatesResponse = response
            .json()
            .await
            .map_err(|e| invalid_payload(SourceKind::Currency, e.to_string()))?;

        Ok(ScreenData::Rates(self.normalize(payload)))
    }
}
