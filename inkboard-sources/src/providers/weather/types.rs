//! OpenWeatherMap response types
//!
//! Only `main` is structurally required; everything else degrades to
//! sentinels during normalization.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WeatherResponse {
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: Option<Wind>,
    /// City name as resolved by the API.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sys: Option<Sys>,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub humidity: i64,
    #[serde(default)]
    pub pressure: i64,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub description: String,
    /// Day/night-qualified icon code, e.g. `10d`.
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: Option<String>,
}
