//! Condition code to icon asset mapping
//!
//! Pure and total: every input resolves to a non-empty asset name, unmapped
//! codes fall back to [`DEFAULT_ICON`]. Day/night variants are distinguished
//! by the `d`/`n` suffix the weather source carries through from upstream.

/// Asset used for unmapped condition codes (clear sky, day).
pub const DEFAULT_ICON: &str = "01d@2x.png";

/// Sentinel condition code for payloads that carried no condition at all.
pub const UNKNOWN_CONDITION: &str = "unknown";

/// Map a condition code to its display asset.
///
/// The code vocabulary is the OpenWeatherMap icon set, see
/// <https://openweathermap.org/weather-conditions>.
pub fn asset_for(condition_code: &str) -> &'static str {
    match condition_code {
        // Clear sky
        "01d" => "01d@2x.png",
        "01n" => "01n@2x.png",
        // Few clouds
        "02d" => "02d@2x.png",
        "02n" => "02n@2x.png",
        // Scattered clouds
        "03d" => "03d@2x.png",
        "03n" => "03n@2x.png",
        // Broken clouds
        "04d" => "04d@2x.png",
        "04n" => "04n@2x.png",
        // Shower rain
        "09d" => "09d@2x.png",
        "09n" => "09n@2x.png",
        // Rain
        "10d" => "10d@2x.png",
        "10n" => "10n@2x.png",
        // Thunderstorm
        "11d" => "11d@2x.png",
        "11n" => "11n@2x.png",
        // Snow
        "13d" => "13d@2x.png",
        "13n" => "13n@2x.png",
        // Mist
        "50d" => "50d@2x.png",
        "50n" => "50n@2x.png",
        _ => DEFAULT_ICON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_codes_map_to_matching_assets() {
        assert_eq!(asset_for("01d"), "01d@2x.png");
        assert_eq!(asset_for("10n"), "10n@2x.png");
        assert_eq!(asset_for("50d"), "50d@2x.png");
    }

    #[test]
    fn test_unknown_codes_fall_back_to_default() {
        assert_eq!(asset_for(""), DEFAULT_ICON);
        assert_eq!(asset_for("99x"), DEFAULT_ICON);
        assert_eq!(asset_for(UNKNOWN_CONDITION), DEFAULT_ICON);
    }

    proptest! {
        /// The mapping is total: any input yields a non-empty asset name.
        #[test]
        fn asset_for_is_total(code in ".*") {
            let asset = asset_for(&code);
            prop_assert!(!asset.is_empty());
            prop_assert!(asset.ends_with("@2x.png"));
        }

        /// Day and night variants of the same condition map to distinct assets.
        #[test]
        fn day_night_variants_differ(num in prop::sample::select(vec![
            "01", "02", "03", "04", "09", "10", "11", "13", "50",
        ])) {
            let day = asset_for(&format!("{num}d"));
            let night = asset_for(&format!("{num}n"));
            prop_assert_ne!(day, night);
        }
    }
}
