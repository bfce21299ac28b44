//! Wind module
//!
//! This module provides the gust normalization and classification pipeline:
//! - Unit conversion (m/s to mph) and compass labels
//! - Field extraction from heterogeneous provider records
//! - Series windowing and selection (max gust, nearest to now, averages)
//! - Severity classification against fixed gust thresholds

pub mod extract;
pub mod series;
pub mod severity;
pub mod units;

// Re-export commonly used types from submodules
pub use extract::{find_direction_value, find_gust_value, find_speed_value};
pub use series::{
    ChartPoint, average_speed, chart_points, filter_window, forecast_window, max_gust,
    max_gust_record, nearest_to_now,
};
pub use severity::{
    ALERT_THRESHOLD_MPH, AMBER_THRESHOLD_MPH, Severity, classify, gust_label, speed_label,
};
pub use units::{degree_to_compass, format_wind_direction, ms_to_mph};
