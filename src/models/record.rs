//! Time-series record model
//!
//! Provider records are kept as raw JSON. Field names differ between the
//! hourly and three-hourly endpoints, so nothing beyond `time` is assumed.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Formats the provider uses besides RFC 3339
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// One timestamped weather reading with provider-specific field names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeriesRecord(Value);

impl TimeSeriesRecord {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Fields of the record, or `None` when the reading is not a JSON object
    #[must_use]
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields().and_then(|fields| fields.get(key))
    }

    /// Raw `time` attribute
    #[must_use]
    pub fn time(&self) -> Option<&str> {
        self.get("time").and_then(Value::as_str)
    }

    /// Parsed `time` attribute; `None` when missing or unparsable
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.time().and_then(parse_timestamp)
    }
}

impl From<Value> for TimeSeriesRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Parse a provider timestamp as UTC.
///
/// Accepts RFC 3339 and the minute-precision `2024-01-15T12:00Z` form the
/// Met Office emits.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
