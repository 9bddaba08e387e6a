//! Data source implementations
//!
//! One module per upstream API. Shared here: the request timeout, error
//! constructors and numeric rounding used by every provider.

use inkboard_core::{FetchError, SourceKind, TickerError};
use std::time::Duration;

pub mod crypto;
pub mod currency;
pub mod weather;

/// Bound on every upstream call; a hung API delays one screen's tick and
/// nothing else.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn unreachable(kind: SourceKind, err: &reqwest::Error) -> TickerError {
    FetchError::Unreachable {
        kind,
        reason: err.to_string(),
    }
    .into()
}

pub(crate) fn request_failed(
    kind: SourceKind,
    status: u16,
    message: impl Into<String>,
) -> TickerError {
    FetchError::RequestFailed {
        kind,
        status,
        message: message.into(),
    }
    .into()
}

pub(crate) fn invalid_payload(kind: SourceKind, reason: impl Into<String>) -> TickerError {
    FetchError::InvalidPayload {
        kind,
        reason: reason.into(),
    }
    .into()
}

/// Round to a fixed number of decimal places (display normalization only;
/// fiat rates are deliberately never passed through this).
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_one_decimal() {
        assert_eq!(round_to(22.46, 1), 22.5);
        assert_eq!(round_to(22.44, 1), 22.4);
        assert_eq!(round_to(-3.25, 1), -3.3);
    }

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to(43250.1249, 2), 43250.12);
        assert_eq!(round_to(1.256, 2), 1.26);
    }
}
