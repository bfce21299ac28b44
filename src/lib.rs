//! `Gustwatch` - wind gust monitoring for fixed properties
//!
//! This library turns Met Office site-specific forecast and observation
//! series into display-ready gust summaries, severity bands, and alert
//! timelines, and ships the proxy that keeps the provider key server-side.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod report;
pub mod summary;
pub mod weather;
pub mod web;
pub mod wind;

// Re-export core types for public API
pub use config::GustWatchConfig;
pub use error::GustError;
pub use models::{GeocodeResult, PropertyConfig, TimeSeriesRecord};
pub use monitor::{DisplayState, Monitor, SearchOutcome};
pub use summary::Dashboard;
pub use weather::{Endpoint, GeocodeSource, WeatherSource};
pub use wind::{Severity, classify, find_gust_value, find_speed_value, ms_to_mph};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GustError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
