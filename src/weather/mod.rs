//! Weather collaborators: postcode geocoding and the Met Office point API
//!
//! The orchestrator only sees the two traits below, so tests and alternative
//! backends can stand in for the HTTP clients.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::Result;
use crate::models::{GeocodeResult, TimeSeriesRecord};

pub mod met_office;
pub mod postcodes;

pub use met_office::MetOfficeClient;
pub use postcodes::PostcodesClient;

/// Met Office site-specific endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    /// Hourly spot data, used as the recent-observation series
    #[serde(rename = "hourly")]
    Hourly,
    /// Three-hourly forecast
    #[serde(rename = "three-hourly")]
    ThreeHourly,
}

impl Endpoint {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Hourly => "hourly",
            Endpoint::ThreeHourly => "three-hourly",
        }
    }

    /// Parse a wire name; anything else is rejected
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "hourly" => Some(Endpoint::Hourly),
            "three-hourly" => Some(Endpoint::ThreeHourly),
            _ => None,
        }
    }

    /// What the series is called in user-facing messages
    #[must_use]
    pub fn data_label(self) -> &'static str {
        match self {
            Endpoint::Hourly => "observation",
            Endpoint::ThreeHourly => "forecast",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Postcode to coordinates
#[async_trait]
pub trait GeocodeSource: Send + Sync {
    async fn lookup(&self, postcode: &str) -> Result<GeocodeResult>;
}

/// Raw GeoJSON-like envelope for a point and endpoint
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, endpoint: Endpoint, latitude: f64, longitude: f64) -> Result<Value>;

    /// False when requests cannot succeed without more configuration
    fn is_configured(&self) -> bool {
        true
    }
}

/// `features[0].properties.timeSeries`, or an empty series
#[must_use]
pub fn extract_time_series(envelope: &Value) -> Vec<TimeSeriesRecord> {
    envelope
        .pointer("/features/0/properties/timeSeries")
        .and_then(Value::as_array)
        .map(|series| series.iter().cloned().map(TimeSeriesRecord::new).collect())
        .unwrap_or_default()
}

/// Site name from the envelope: `location.name`, then `nearestTown`, then `siteName`
#[must_use]
pub fn extract_location_name(envelope: &Value) -> Option<String> {
    let properties = envelope.pointer("/features/0/properties")?;
    ["/location/name", "/nearestTown", "/siteName"]
        .iter()
        .filter_map(|pointer| properties.pointer(pointer).and_then(Value::as_str))
        .find(|name| !name.trim().is_empty())
        .map(str::to_string)
}
