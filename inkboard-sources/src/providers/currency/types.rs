//! freecurrencyapi response types

use serde::Deserialize;
use std::collections::HashMap;

/// `/v1/latest` response. A body without `data` is structurally invalid.
#[derive(Debug, Deserialize)]
pub struct LatestRatesResponse {
    pub data: HashMap<String, f64>,
}
