//! OpenWeatherMap client

mod types;

use async_trait::async_trait;
use inkboard_core::icons::UNKNOWN_CONDITION;
use inkboard_core::{ScreenData, SourceKind, TickerResult, WeatherReport, WeatherSettings};
use reqwest::Client;
use tracing::debug;

use super::{invalid_payload, request_failed, round_to, unreachable, REQUEST_TIMEOUT};
use crate::DataSource;
use types::WeatherResponse;

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Current-weather source backed by OpenWeatherMap.
pub struct WeatherSource {
    client: Client,
    settings: WeatherSettings,
    base_url: String,
}

impl WeatherSource {
    pub fn new(settings: WeatherSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            base_url: OPENWEATHER_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Query-string location: configured locality fields joined with `,`.
    fn query_location(&self) -> String {
        let mut parts = vec![self.settings.city.clone()];
        if let Some(state) = &self.settings.state {
            parts.push(state.clone());
        }
        if let Some(country) = &self.settings.country {
            parts.push(country.clone());
        }
        parts.join(",")
    }

    fn normalize(&self, payload: WeatherResponse) -> WeatherReport {
        let condition = payload.weather.into_iter().next();
        let (condition_code, description) = match condition {
            Some(c) => (
                if c.icon.is_empty() {
                    UNKNOWN_CONDITION.to_string()
                } else {
                    c.icon
                },
                if c.description.is_empty() {
                    "Unknown".to_string()
                } else {
                    title_case(&c.description)
                },
            ),
            None => (UNKNOWN_CONDITION.to_string(), "Unknown".to_string()),
        };

        let city = if payload.name.is_empty() {
            self.settings.city.clone()
        } else {
            payload.name
        };
        let country = payload
            .sys
            .and_then(|s| s.country)
            .or_else(|| self.settings.country.clone());

        WeatherReport {
            location: location_label(&city, self.settings.state.as_deref(), country.as_deref()),
            temperature_c: round_to(payload.main.temp, 1),
            feels_like_c: round_to(payload.main.feels_like, 1),
            temp_min_c: round_to(payload.main.temp_min, 1),
            temp_max_c: round_to(payload.main.temp_max, 1),
            condition_code,
            description,
            humidity: payload.main.humidity,
            pressure_hpa: payload.main.pressure,
            wind_speed: round_to(payload.wind.map(|w| w.speed).unwrap_or(0.0), 1),
        }
    }
}

#[async_trait]
impl DataSource for WeatherSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Weather
    }

    async fn fetch(&self) -> TickerResult<ScreenData> {
        let location = self.query_location();
        debug!(%location, "Fetching weather");

        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("q", location.as_str()),
                ("appid", self.settings.api_key.as_str()),
                ("units", "metric"),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| unreachable(SourceKind::Weather, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(request_failed(SourceKind::Weather, status.as_u16(), body));
        }

        let payload: WeatherResponse = response
            .json()
            .await
            .map_err(|e| invalid_payload(SourceKind::Weather, e.to_string()))?;

        Ok(ScreenData::Weather(self.normalize(payload)))
    }
}

/// Join available locality fields with `", "`, omitting absent ones.
fn location_label(city: &str, state: Option<&str>, country: Option<&str>) -> String {
    let mut parts = vec![city];
    if let Some(state) = state.filter(|s| !s.is_empty()) {
        parts.push(state);
    }
    if let Some(country) = country.filter(|c| !c.is_empty()) {
        parts.push(country);
    }
    parts.join(", ")
}

/// Uppercase the first letter of each word (`"light rain"` -> `"Light Rain"`).
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
