//! Field extraction for heterogeneous provider records
//!
//! The hourly and three-hourly endpoints name their wind fields differently
//! (`windGustSpeed10m` vs `max10mWindGust`), and older API versions differ
//! again. Each value is resolved from an ordered list of known names first,
//! then by a case-insensitive scan over the record's own keys.

use crate::models::TimeSeriesRecord;
use serde_json::{Map, Value};

use super::units::ms_to_mph;

const GUST_FIELDS: [&str; 4] = ["windGustSpeed10m", "max10mWindGust", "windGust", "gustSpeed"];
const SPEED_FIELDS: [&str; 2] = ["windSpeed10m", "windSpeed"];
const DIRECTION_FIELDS: [&str; 2] = ["windDirectionFrom10m", "windDirection"];

/// Gust in mph, or `None` when the record carries no gust field.
///
/// A known field holding `null` counts as absent rather than as zero, so the
/// next candidate is tried.
#[must_use]
pub fn find_gust_value(record: &TimeSeriesRecord) -> Option<f64> {
    let fields = record.fields()?;
    first_known(fields, &GUST_FIELDS)
        .or_else(|| first_matching(fields, |key| key.contains("gust")))
        .map(ms_to_mph)
}

/// Sustained wind speed in mph, never read from a gust-named field
#[must_use]
pub fn find_speed_value(record: &TimeSeriesRecord) -> Option<f64> {
    let fields = record.fields()?;
    first_known(fields, &SPEED_FIELDS)
        .or_else(|| generic_speed(fields))
        .or_else(|| {
            first_matching(fields, |key| {
                key.contains("wind") && key.contains("speed") && !key.contains("gust")
            })
        })
        .map(ms_to_mph)
}

/// Wind direction in degrees ("from"), unconverted
#[must_use]
pub fn find_direction_value(record: &TimeSeriesRecord) -> Option<f64> {
    let fields = record.fields()?;
    first_known(fields, &DIRECTION_FIELDS)
        .or_else(|| first_matching(fields, |key| key.contains("direction")))
}

/// A bare `speed` field counts unless a gust-named field holds the same
/// number (`7` and `7.0` collide)
fn generic_speed(fields: &Map<String, Value>) -> Option<f64> {
    let speed = as_number(fields.get("speed")?)?;
    let shadowed = fields.iter().any(|(key, value)| {
        key.to_lowercase().contains("gust") && as_number(value) == Some(speed)
    });
    if shadowed { None } else { Some(speed) }
}

fn first_known(fields: &Map<String, Value>, names: &[&str]) -> Option<f64> {
    names
        .iter()
        .find_map(|name| fields.get(*name).and_then(as_number))
}

/// First field, in record order, whose lowercased name satisfies `predicate`
fn first_matching(fields: &Map<String, Value>, predicate: impl Fn(&str) -> bool) -> Option<f64> {
    fields
        .iter()
        .filter(|(key, _)| predicate(&key.to_lowercase()))
        .find_map(|(_, value)| as_number(value))
}

/// Numeric coercion. Null, containers, and non-numeric text count as absent.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> TimeSeriesRecord {
        TimeSeriesRecord::new(value)
    }

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("value should be present");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_gust_priority_order() {
        let entry = record(json!({
            "gustSpeed": 1.0,
            "windGust": 2.0,
            "max10mWindGust": 3.0,
            "windGustSpeed10m": 4.0,
        }));
        approx(find_gust_value(&entry), 4.0 * 2.237);

        let three_hourly = record(json!({ "time": "2024-01-15T12:00Z", "max10mWindGust": 10.0 }));
        approx(find_gust_value(&three_hourly), 22.37);
    }

    #[test]
    fn test_zero_gust_is_present() {
        let entry = record(json!({ "windGustSpeed10m": 0, "someGust": 12.0 }));
        approx(find_gust_value(&entry), 0.0);
    }

    #[test]
    fn test_generic_gust_key_is_case_insensitive() {
        let entry = record(json!({ "time": "2024-01-15T12:00Z", "PeakGUSTValue": 20.0 }));
        approx(find_gust_value(&entry), 44.74);
    }

    #[test]
    fn test_generic_gust_takes_first_key_in_record_order() {
        let entry = record(json!({ "gustA": 1.0, "gustB": 2.0 }));
        approx(find_gust_value(&entry), 2.237);
    }

    #[test]
    fn test_missing_gust_is_none() {
        let entry = record(json!({ "time": "2024-01-15T12:00Z", "windSpeed10m": 5.0 }));
        assert_eq!(find_gust_value(&entry), None);
    }

    #[test]
    fn test_null_gust_falls_through() {
        let entry = record(json!({ "windGustSpeed10m": null, "windGust": 5.0 }));
        approx(find_gust_value(&entry), 5.0 * 2.237);

        let only_null = record(json!({ "windGustSpeed10m": null }));
        assert_eq!(find_gust_value(&only_null), None);
    }

    #[test]
    fn test_numeric_string_is_coerced() {
        let entry = record(json!({ "windGust": "10" }));
        approx(find_gust_value(&entry), 22.37);
    }

    #[test]
    fn test_non_object_records_yield_none() {
        for value in [json!(null), json!(3.5), json!("gust"), json!([1, 2])] {
            let entry = record(value);
            assert_eq!(find_gust_value(&entry), None);
            assert_eq!(find_speed_value(&entry), None);
            assert_eq!(find_direction_value(&entry), None);
        }
    }

    #[test]
    fn test_speed_priority_order() {
        let entry = record(json!({ "windSpeed": 1.0, "windSpeed10m": 2.0 }));
        approx(find_speed_value(&entry), 2.0 * 2.237);
    }

    #[test]
    fn test_generic_speed_shadowed_by_gust_value() {
        let shadowed = record(json!({ "speed": 7.0, "gust": 7.0 }));
        assert_eq!(find_speed_value(&shadowed), None);

        let distinct = record(json!({ "speed": 7.0, "gust": 9.0 }));
        approx(find_speed_value(&distinct), 7.0 * 2.237);
    }

    #[test]
    fn test_generic_speed_shadow_compares_numbers() {
        let integer_and_float = record(json!({ "speed": 7, "gust": 7.0 }));
        assert_eq!(find_speed_value(&integer_and_float), None);

        let numeric_text = record(json!({ "speed": "7", "peakGust": 7 }));
        assert_eq!(find_speed_value(&numeric_text), None);
    }

    #[test]
    fn test_speed_fallback_excludes_gust_fields() {
        let entry = record(json!({ "windGustSpeedMax": 9.0, "meanWindSpeedAt10m": 4.0 }));
        approx(find_speed_value(&entry), 4.0 * 2.237);

        let only_gust = record(json!({ "windGustSpeedMax": 9.0 }));
        assert_eq!(find_speed_value(&only_gust), None);
    }

    #[test]
    fn test_direction_lookup() {
        let entry = record(json!({ "windDirectionFrom10m": 225 }));
        assert_eq!(find_direction_value(&entry), Some(225.0));

        let generic = record(json!({ "meanDirection": 90 }));
        assert_eq!(find_direction_value(&generic), Some(90.0));
    }
}
