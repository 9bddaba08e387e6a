//! Screen composition
//!
//! Maps one normalized payload into one renderable [`Screen`]. The content
//! of a screen always traces to exactly one cache entry (or one placeholder
//! when the source is down and nothing is cached).

use inkboard_core::{icons, RateBoard, Screen, ScreenData, SourceKind, WeatherReport};

/// Display title for a source's screen.
pub fn title_for(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Weather => "Weather",
        SourceKind::Currency => "Exchange Rates",
        SourceKind::Crypto => "Bitcoin Prices",
    }
}

/// Build the screen for a source's current data.
pub fn compose(kind: SourceKind, data: &ScreenData, is_stale: bool) -> Screen {
    let (lines, icon_asset) = match data {
        ScreenData::Weather(report) => (
            weather_lines(report),
            Some(icons::asset_for(&report.condition_code).to_string()),
        ),
        ScreenData::Rates(board) => (rate_lines(kind, board), None),
    };

    Screen {
        id: kind.as_str().to_string(),
        title: title_for(kind).to_string(),
        lines,
        icon_asset,
        is_stale,
    }
}

/// Error screen shown when a source is down and nothing is cached. The
/// rotation keeps moving; this is the only user-visible form of failure.
pub fn placeholder(kind: SourceKind) -> Screen {
    Screen {
        id: kind.as_str().to_string(),
        title: title_for(kind).to_string(),
        lines: vec![format!("{kind}: data unavailable")],
        icon_asset: None,
        is_stale: false,
    }
}

fn weather_lines(report: &WeatherReport) -> Vec<String> {
    vec![
        format!("{:.1}°C  {}", report.temperature_c, report.description),
        format!(
            "Feels like {:.1}°C ({:.1}° / {:.1}°)",
            report.feels_like_c, report.temp_min_c, report.temp_max_c
        ),
        format!(
            "Humidity {}%  Wind {:.1} m/s",
            report.humidity, report.wind_speed
        ),
        report.location.clone(),
    ]
}

fn rate_lines(kind: SourceKind, board: &RateBoard) -> Vec<String> {
    board
        .pairs
        .iter()
        .map(|pair| {
            if pair.rate == 0.0 {
                return format!("{}: N/A", pair.symbol);
            }
            if kind == SourceKind::Crypto {
                let sign = currency_sign(&pair.symbol);
                let mut line = format!("{}: {}{}", pair.symbol, sign, group_thousands(pair.rate));
                if let Some(change) = pair.change_24h {
                    line.push_str(&format!(" ({change:+.2}%)"));
                }
                line
            } else {
                // Fiat rates are shown at source precision.
                format!("{}: {}", pair.symbol, pair.rate)
            }
        })
        .collect()
}

fn currency_sign(symbol: &str) -> &'static str {
    if symbol.ends_with("/USD") {
        "$"
    } else if symbol.ends_with("/EUR") {
        "€"
    } else {
        ""
    }
}

/// `43250.12` -> `"43,250.12"`.
fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
