//! Data models for the Gustwatch application
//!
//! This module contains the core domain models organized by concern:
//! - Location: geocoded coordinates and display label
//! - Property: the static list of monitored properties
//! - Record: one heterogeneous time-series reading from the provider

pub mod location;
pub mod property;
pub mod record;

// Re-export all public types for convenient access
pub use location::GeocodeResult;
pub use property::PropertyConfig;
pub use record::TimeSeriesRecord;
