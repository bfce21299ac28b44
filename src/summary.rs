//! Display-ready summaries built from historic and forecast series
//!
//! Every view here is plain data. Text rendering lives in [`crate::report`]
//! and the JSON surface serializes these types directly.

use crate::models::TimeSeriesRecord;
use crate::wind::{
    ALERT_THRESHOLD_MPH, ChartPoint, Severity, average_speed, chart_points, classify,
    degree_to_compass, find_direction_value, find_gust_value, find_speed_value, gust_label,
    max_gust, max_gust_record, nearest_to_now, speed_label,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tone of the page-level status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Success,
    Warning,
    Danger,
}

/// Single human-readable status shown above the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
    pub tone: Tone,
}

impl StatusMessage {
    pub fn info<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Info,
        }
    }

    pub fn danger<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Danger,
        }
    }

    /// Status line for the overall gust severity
    #[must_use]
    pub fn for_severity(severity: Severity) -> Self {
        let (message, tone) = match severity {
            Severity::Danger => (
                "Red alert: forecast or recent gusts exceed 45 mph.",
                Tone::Danger,
            ),
            Severity::Amber => ("Amber watch: gusts approaching 45 mph.", Tone::Warning),
            Severity::Safe => ("All clear: gusts below 45 mph.", Tone::Success),
            Severity::Neutral => ("No gust data available for this location.", Tone::Info),
        };
        Self {
            message: message.to_string(),
            tone,
        }
    }
}

/// The reading shown as "right now"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentView {
    /// False for the placeholder shown before or after a failed search
    pub has_data: bool,
    pub gust: Option<f64>,
    pub speed: Option<f64>,
    /// Raw `time` attribute of the selected record
    pub time: Option<String>,
    pub valid_at: Option<DateTime<Utc>>,
    pub severity: Severity,
}

impl CurrentView {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            has_data: false,
            gust: None,
            speed: None,
            time: None,
            valid_at: None,
            severity: Severity::Neutral,
        }
    }

    #[must_use]
    pub fn from_record(record: &TimeSeriesRecord) -> Self {
        let gust = find_gust_value(record);
        Self {
            has_data: true,
            gust,
            speed: find_speed_value(record),
            time: record.time().map(str::to_string),
            valid_at: record.timestamp(),
            severity: classify(gust),
        }
    }

    /// Nearest forecast record, else the latest observation, else nothing
    #[must_use]
    pub fn select(
        history: &[TimeSeriesRecord],
        forecast: &[TimeSeriesRecord],
        now: DateTime<Utc>,
    ) -> Self {
        let record = if forecast.is_empty() {
            history.last()
        } else {
            nearest_to_now(forecast, now)
        };
        record.map_or_else(Self::empty, Self::from_record)
    }

    #[must_use]
    pub fn gust_label(&self) -> String {
        gust_label(self.gust)
    }

    #[must_use]
    pub fn speed_label(&self) -> String {
        speed_label(self.speed)
    }
}

/// Max gust and mean speed over one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SeriesSummary {
    NoData,
    Summary {
        max_gust: Option<f64>,
        max_gust_at: Option<DateTime<Utc>>,
        average_speed: f64,
        severity: Severity,
    },
}

impl SeriesSummary {
    #[must_use]
    pub fn from_series(series: &[TimeSeriesRecord]) -> Self {
        let Some(record) = max_gust_record(series) else {
            return Self::NoData;
        };
        let max_gust = find_gust_value(record);
        Self::Summary {
            max_gust,
            max_gust_at: record.timestamp(),
            average_speed: average_speed(series),
            severity: classify(max_gust),
        }
    }
}

/// Strongest gust of the primary series and where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DailySummary {
    NoData,
    Summary {
        max_gust: Option<f64>,
        direction: Option<f64>,
        compass: String,
    },
}

impl DailySummary {
    /// Uses the forecast when it has records, otherwise the history
    #[must_use]
    pub fn from_series(history: &[TimeSeriesRecord], forecast: &[TimeSeriesRecord]) -> Self {
        let primary = if forecast.is_empty() { history } else { forecast };
        let Some(record) = max_gust_record(primary) else {
            return Self::NoData;
        };
        let direction = find_direction_value(record);
        Self::Summary {
            max_gust: find_gust_value(record),
            direction,
            compass: degree_to_compass(direction).to_string(),
        }
    }

    /// "Max gust 47 mph from the WSW"
    #[must_use]
    pub fn headline(&self) -> String {
        match self {
            Self::NoData => "No data available".to_string(),
            Self::Summary {
                max_gust, compass, ..
            } => format!("Max gust {} from the {}", gust_label(*max_gust), compass),
        }
    }
}

/// A record at or above the alert threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    pub time: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub gust: Option<f64>,
    pub speed: Option<f64>,
}

/// Alert timeline for one series. An empty series and a quiet series are
/// different states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "alerts", rename_all = "snake_case")]
pub enum AlertList {
    NoData,
    NoWarnings,
    Warnings(Vec<AlertEntry>),
}

impl AlertList {
    #[must_use]
    pub fn from_series(series: &[TimeSeriesRecord]) -> Self {
        if series.is_empty() {
            return Self::NoData;
        }
        let warnings: Vec<AlertEntry> = series
            .iter()
            .filter_map(|record| {
                let gust = find_gust_value(record).filter(|g| *g >= ALERT_THRESHOLD_MPH)?;
                Some(AlertEntry {
                    time: record.time().map(str::to_string),
                    timestamp: record.timestamp(),
                    gust: Some(gust),
                    speed: find_speed_value(record),
                })
            })
            .collect();

        if warnings.is_empty() {
            Self::NoWarnings
        } else {
            Self::Warnings(warnings)
        }
    }
}

/// Everything one search renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub current: CurrentView,
    pub daily: DailySummary,
    pub historic: SeriesSummary,
    pub forecast: SeriesSummary,
    pub forecast_alerts: AlertList,
    pub history_alerts: AlertList,
    pub chart: Vec<ChartPoint>,
    /// Classification of the highest gust across both series
    pub severity: Severity,
}

impl Dashboard {
    /// Build all views. `forecast` is expected to be windowed already.
    #[must_use]
    pub fn build(
        history: &[TimeSeriesRecord],
        forecast: &[TimeSeriesRecord],
        now: DateTime<Utc>,
        chart_span: Duration,
    ) -> Self {
        let overall = match (max_gust(forecast), max_gust(history)) {
            (Some(f), Some(h)) => Some(f.max(h)),
            (f, h) => f.or(h),
        };

        Self {
            current: CurrentView::select(history, forecast, now),
            daily: DailySummary::from_series(history, forecast),
            historic: SeriesSummary::from_series(history),
            forecast: SeriesSummary::from_series(forecast),
            forecast_alerts: AlertList::from_series(forecast),
            history_alerts: AlertList::from_series(history),
            chart: chart_points(history, forecast, now, chart_span),
            severity: classify(overall),
        }
    }

    /// Empty state shown before the first search and after a failure
    #[must_use]
    pub fn reset() -> Self {
        Self {
            current: CurrentView::empty(),
            daily: DailySummary::NoData,
            historic: SeriesSummary::NoData,
            forecast: SeriesSummary::NoData,
            forecast_alerts: AlertList::NoData,
            history_alerts: AlertList::NoData,
            chart: Vec::new(),
            severity: Severity::Neutral,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusMessage {
        StatusMessage::for_severity(self.severity)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn reading(hours: i64, gust_ms: f64, speed_ms: f64, direction: f64) -> TimeSeriesRecord {
        let time = (now() + Duration::hours(hours))
            .format("%Y-%m-%dT%H:%MZ")
            .to_string();
        TimeSeriesRecord::new(json!({
            "time": time,
            "windGustSpeed10m": gust_ms,
            "windSpeed10m": speed_ms,
            "windDirectionFrom10m": direction,
        }))
    }

    #[test]
    fn test_current_prefers_nearest_forecast() {
        let history = vec![reading(-1, 5.0, 2.0, 0.0)];
        let forecast = vec![reading(3, 8.0, 4.0, 0.0), reading(1, 9.0, 5.0, 0.0)];

        let current = CurrentView::select(&history, &forecast, now());
        assert!(current.has_data);
        assert_eq!(current.time.as_deref(), Some("2024-01-15T13:00Z"));
        assert_eq!(current.gust_label(), "20 mph");
        assert_eq!(current.speed_label(), "Speed: 11 mph");
    }

    #[test]
    fn test_current_falls_back_to_last_observation() {
        let history = vec![reading(-3, 5.0, 2.0, 0.0), reading(-1, 6.0, 3.0, 0.0)];
        let current = CurrentView::select(&history, &[], now());
        assert_eq!(current.time.as_deref(), Some("2024-01-15T11:00Z"));

        let empty = CurrentView::select(&[], &[], now());
        assert_eq!(empty, CurrentView::empty());
        assert_eq!(empty.gust_label(), "--");
    }

    #[test]
    fn test_series_summary_no_data() {
        assert_eq!(SeriesSummary::from_series(&[]), SeriesSummary::NoData);
    }

    #[test]
    fn test_series_summary_values() {
        let series = vec![reading(1, 10.0, 4.0, 0.0), reading(2, 22.0, 6.0, 0.0)];
        let SeriesSummary::Summary {
            max_gust,
            max_gust_at,
            average_speed,
            severity,
        } = SeriesSummary::from_series(&series)
        else {
            panic!("expected a summary");
        };
        assert!((max_gust.unwrap() - 22.0 * 2.237).abs() < 1e-9);
        assert_eq!(max_gust_at, Some(now() + Duration::hours(2)));
        assert!((average_speed - 5.0 * 2.237).abs() < 1e-9);
        assert_eq!(severity, Severity::Danger);
    }

    #[test]
    fn test_daily_summary_uses_direction_of_max_gust() {
        let forecast = vec![reading(1, 10.0, 4.0, 90.0), reading(2, 21.0, 6.0, 247.5)];
        let daily = DailySummary::from_series(&[], &forecast);
        assert_eq!(daily.headline(), "Max gust 47 mph from the WSW");

        let from_history = DailySummary::from_series(&[reading(-1, 1.0, 1.0, 180.0)], &[]);
        assert!(from_history.headline().ends_with("from the S"));

        assert_eq!(DailySummary::from_series(&[], &[]), DailySummary::NoData);
    }

    #[test]
    fn test_alert_list_states_are_distinct() {
        assert_eq!(AlertList::from_series(&[]), AlertList::NoData);

        let calm = vec![reading(1, 5.0, 2.0, 0.0)];
        assert_eq!(AlertList::from_series(&calm), AlertList::NoWarnings);

        let stormy = vec![reading(1, 5.0, 2.0, 0.0), reading(2, 21.0, 9.0, 0.0)];
        let AlertList::Warnings(alerts) = AlertList::from_series(&stormy) else {
            panic!("expected warnings");
        };
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].time.as_deref(), Some("2024-01-15T14:00Z"));
        assert_eq!(gust_label(alerts[0].gust), "47 mph");
    }

    #[test]
    fn test_dashboard_overall_severity() {
        let history = vec![reading(-2, 17.0, 8.0, 0.0)];
        let forecast = vec![reading(2, 5.0, 2.0, 0.0)];
        let dashboard = Dashboard::build(&history, &forecast, now(), Duration::hours(48));
        assert_eq!(dashboard.severity, Severity::Amber);
        assert_eq!(dashboard.status().tone, Tone::Warning);
        assert_eq!(dashboard.chart.len(), 2);
    }

    #[test]
    fn test_dashboard_without_data_is_neutral() {
        let dashboard = Dashboard::build(&[], &[], now(), Duration::hours(48));
        assert_eq!(dashboard, Dashboard::reset());
        assert_eq!(
            dashboard.status().message,
            "No gust data available for this location."
        );
    }
}
