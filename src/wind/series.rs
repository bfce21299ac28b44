//! Series windowing and record selection

use crate::models::TimeSeriesRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::extract::{find_gust_value, find_speed_value};

/// One point of the combined speed/gust chart, values in mph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub speed: Option<f64>,
    pub gust: Option<f64>,
}

/// Records whose timestamp falls in `[start, end]`. Unparsable times are dropped.
#[must_use]
pub fn filter_window(
    series: &[TimeSeriesRecord],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<TimeSeriesRecord> {
    series
        .iter()
        .filter(|record| {
            record
                .timestamp()
                .is_some_and(|ts| ts >= start && ts <= end)
        })
        .cloned()
        .collect()
}

/// Forecast records between now and `now + horizon`
#[must_use]
pub fn forecast_window(
    series: &[TimeSeriesRecord],
    now: DateTime<Utc>,
    horizon: Duration,
) -> Vec<TimeSeriesRecord> {
    filter_window(series, now, now + horizon)
}

/// Record with the highest gust. Missing gusts compare as zero and ties keep
/// the earliest record.
#[must_use]
pub fn max_gust_record(series: &[TimeSeriesRecord]) -> Option<&TimeSeriesRecord> {
    let mut records = series.iter();
    let first = records.next()?;
    let mut best = (first, find_gust_value(first).unwrap_or(0.0));

    for record in records {
        let gust = find_gust_value(record).unwrap_or(0.0);
        if gust > best.1 {
            best = (record, gust);
        }
    }
    Some(best.0)
}

/// Highest gust in the series (missing = 0), `None` for an empty series
#[must_use]
pub fn max_gust(series: &[TimeSeriesRecord]) -> Option<f64> {
    series
        .iter()
        .map(|record| find_gust_value(record).unwrap_or(0.0))
        .reduce(f64::max)
}

/// Record closest in time to `now`; ties keep the earliest record.
///
/// The first record is the starting candidate, so a series without any
/// parsable timestamp still returns its first entry.
#[must_use]
pub fn nearest_to_now(series: &[TimeSeriesRecord], now: DateTime<Utc>) -> Option<&TimeSeriesRecord> {
    let mut best: Option<(&TimeSeriesRecord, Duration)> = None;

    for record in series {
        let Some(ts) = record.timestamp() else {
            continue;
        };
        let distance = (ts - now).abs();
        if best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((record, distance));
        }
    }

    best.map(|(record, _)| record).or_else(|| series.first())
}

/// Mean sustained speed in mph, missing speeds counted as zero. 0 when empty.
#[must_use]
pub fn average_speed(series: &[TimeSeriesRecord]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let total: f64 = series
        .iter()
        .map(|record| find_speed_value(record).unwrap_or(0.0))
        .sum();
    total / series.len() as f64
}

/// History and forecast merged into one time-ordered chart series,
/// limited to `span` either side of `now`
#[must_use]
pub fn chart_points(
    history: &[TimeSeriesRecord],
    forecast: &[TimeSeriesRecord],
    now: DateTime<Utc>,
    span: Duration,
) -> Vec<ChartPoint> {
    let (start, end) = (now - span, now + span);
    let mut points: Vec<ChartPoint> = history
        .iter()
        .chain(forecast)
        .filter_map(|record| {
            let timestamp = record.timestamp().filter(|ts| *ts >= start && *ts <= end)?;
            Some(ChartPoint {
                timestamp,
                speed: find_speed_value(record),
                gust: find_gust_value(record),
            })
        })
        .collect();

    points.sort_by_key(|point| point.timestamp);
    points
}
