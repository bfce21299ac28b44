//! Unit conversion and compass labels

/// Metres per second to miles per hour
pub const MS_TO_MPH: f64 = 2.237;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Convert a provider speed (m/s) to mph. Applied to every gust and speed.
#[must_use]
pub fn ms_to_mph(value: f64) -> f64 {
    value * MS_TO_MPH
}

/// 16-point compass label for a bearing in degrees, nearest 22.5° sector.
///
/// A missing bearing reads as north. Halves round up, so 11.25° is NNE.
#[must_use]
pub fn degree_to_compass(degrees: Option<f64>) -> &'static str {
    let degrees = degrees.filter(|d| d.is_finite()).unwrap_or(0.0);
    let sector = (degrees / 22.5 + 0.5).floor() as i64;
    COMPASS_POINTS[sector.rem_euclid(16) as usize]
}

/// "WSW (247°)", or "--" without a bearing
#[must_use]
pub fn format_wind_direction(degrees: Option<f64>) -> String {
    match degrees {
        Some(d) if d.is_finite() => format!("{} ({}°)", degree_to_compass(Some(d)), d.round()),
        _ => "--".to_string(),
    }
}
