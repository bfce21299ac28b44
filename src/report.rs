//! Plain-text rendering of the display state for the CLI
//!
//! Times are shown the way a UK reader expects them: Europe/London local
//! time, `Mon 15 Jan, 13:00`.

use chrono::{DateTime, Utc};
use chrono_tz::Europe::London;
use std::fmt;

use crate::config::ForecastHorizon;
use crate::monitor::{DisplayState, SearchOutcome};
use crate::summary::{AlertList, CurrentView, DailySummary, Dashboard, SeriesSummary};
use crate::wind::{format_wind_direction, gust_label, speed_label};

const TIME_NOT_PROVIDED: &str = "Time not provided";
const NO_DATA_YET: &str = "No data yet";

/// `Mon 15 Jan, 13:00` in UK local time
#[must_use]
pub fn format_local_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&London)
        .format("%a %-d %b, %H:%M")
        .to_string()
}

/// Formatted time, or the raw provider string if it did not parse
fn record_time(timestamp: Option<DateTime<Utc>>, raw: Option<&str>) -> String {
    match (timestamp, raw) {
        (Some(ts), _) => format_local_time(ts),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => TIME_NOT_PROVIDED.to_string(),
    }
}

/// "Valid at ..." line under the current reading
#[must_use]
pub fn valid_at_label(current: &CurrentView) -> String {
    if !current.has_data {
        return NO_DATA_YET.to_string();
    }
    match (current.valid_at, current.time.as_deref()) {
        (None, None) => TIME_NOT_PROVIDED.to_string(),
        (ts, raw) => format!("Valid at {}", record_time(ts, raw)),
    }
}

/// Summary line for one series
#[must_use]
pub fn series_line(summary: &SeriesSummary) -> String {
    match summary {
        SeriesSummary::NoData => "No data".to_string(),
        SeriesSummary::Summary {
            max_gust,
            max_gust_at,
            average_speed,
            severity,
        } => format!(
            "Max gust {} ({}) at {}, average speed {:.0} mph",
            gust_label(*max_gust),
            severity,
            max_gust_at.map_or_else(|| TIME_NOT_PROVIDED.to_string(), format_local_time),
            average_speed
        ),
    }
}

/// Empty-state text for an alert timeline
#[derive(Debug, Clone, Copy)]
pub struct AlertWording<'a> {
    pub no_data: &'a str,
    pub no_warnings: &'a str,
}

fn write_alerts(f: &mut fmt::Formatter<'_>, alerts: &AlertList, wording: AlertWording<'_>) -> fmt::Result {
    match alerts {
        AlertList::NoData => writeln!(f, "  {}", wording.no_data),
        AlertList::NoWarnings => writeln!(f, "  {}", wording.no_warnings),
        AlertList::Warnings(entries) => {
            for entry in entries {
                writeln!(
                    f,
                    "  {}: gust {}, {}",
                    record_time(entry.timestamp, entry.time.as_deref()),
                    gust_label(entry.gust),
                    speed_label(entry.speed)
                )?;
            }
            Ok(())
        }
    }
}

/// Text view of a dashboard
pub struct DashboardReport<'a> {
    pub dashboard: &'a Dashboard,
    pub horizon: ForecastHorizon,
}

impl fmt::Display for DashboardReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dashboard = self.dashboard;
        let current = &dashboard.current;

        writeln!(f, "Current gust: {} [{}]", current.gust_label(), current.severity)?;
        writeln!(f, "  {}", current.speed_label())?;
        writeln!(f, "  {}", valid_at_label(current))?;

        writeln!(f, "Daily: {}", dashboard.daily.headline())?;
        if let DailySummary::Summary { direction, .. } = &dashboard.daily {
            writeln!(f, "  Direction: {}", format_wind_direction(*direction))?;
        }
        writeln!(f, "Recent observations: {}", series_line(&dashboard.historic))?;
        writeln!(f, "Forecast: {}", series_line(&dashboard.forecast))?;

        let no_warnings = format!("No warnings of high wind in {}.", self.horizon.label());
        writeln!(f, "Forecast warnings:")?;
        write_alerts(
            f,
            &dashboard.forecast_alerts,
            AlertWording {
                no_data: "No forecast data available.",
                no_warnings: &no_warnings,
            },
        )?;

        writeln!(f, "Recent warnings:")?;
        write_alerts(
            f,
            &dashboard.history_alerts,
            AlertWording {
                no_data: "No observations in the last 48 hours.",
                no_warnings: "No high wind warnings in the last 48 hours.",
            },
        )
    }
}

/// Full report for a successful search
pub struct OutcomeReport<'a>(pub &'a SearchOutcome);

impl fmt::Display for OutcomeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        writeln!(f, "{}", outcome.location_info)?;
        writeln!(f, "{}", outcome.status.message)?;
        writeln!(f)?;
        write!(
            f,
            "{}",
            DashboardReport {
                dashboard: &outcome.dashboard,
                horizon: outcome.forecast_horizon,
            }
        )
    }
}

/// Report for whatever the monitor currently displays
pub struct DisplayReport<'a> {
    pub state: &'a DisplayState,
    pub horizon: ForecastHorizon,
}

impl fmt::Display for DisplayReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.state.location_info)?;
        writeln!(f, "{}", self.state.status.message)?;
        writeln!(f)?;
        write!(
            f,
            "{}",
            DashboardReport {
                dashboard: &self.state.dashboard,
                horizon: self.horizon,
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GustError;
    use crate::models::TimeSeriesRecord;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn reading(hours: i64, gust_ms: f64) -> TimeSeriesRecord {
        let time = (now() + Duration::hours(hours))
            .format("%Y-%m-%dT%H:%MZ")
            .to_string();
        TimeSeriesRecord::new(json!({
            "time": time,
            "windGustSpeed10m": gust_ms,
            "windSpeed10m": 5.0,
            "windDirectionFrom10m": 247.0,
        }))
    }

    #[test]
    fn test_format_local_time_handles_bst() {
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 13, 0, 0).unwrap();
        assert_eq!(format_local_time(winter), "Mon 15 Jan, 13:00");

        let summer = Utc.with_ymd_and_hms(2024, 7, 1, 13, 0, 0).unwrap();
        assert_eq!(format_local_time(summer), "Mon 1 Jul, 14:00");
    }

    #[test]
    fn test_valid_at_label() {
        assert_eq!(valid_at_label(&CurrentView::empty()), NO_DATA_YET);

        let current = CurrentView::from_record(&reading(1, 10.0));
        assert_eq!(valid_at_label(&current), "Valid at Mon 15 Jan, 13:00");

        let untimed = CurrentView::from_record(&TimeSeriesRecord::new(json!({ "windGust": 3.0 })));
        assert_eq!(valid_at_label(&untimed), TIME_NOT_PROVIDED);
    }

    #[test]
    fn test_dashboard_report_with_warnings() {
        let forecast = vec![reading(1, 10.0), reading(3, 21.0)];
        let dashboard = Dashboard::build(&[], &forecast, now(), Duration::hours(48));
        let text = DashboardReport {
            dashboard: &dashboard,
            horizon: ForecastHorizon::FortyEightHours,
        }
        .to_string();

        assert!(text.contains("Daily: Max gust 47 mph from the WSW"));
        assert!(text.contains("Direction: WSW (247°)"));
        assert!(text.contains("Mon 15 Jan, 15:00: gust 47 mph, Speed: 11 mph"));
        assert!(text.contains("Recent observations: No data"));
        assert!(text.contains("No observations in the last 48 hours."));
    }

    #[test]
    fn test_empty_states_are_worded_per_horizon() {
        let calm = vec![reading(1, 4.0)];
        let dashboard = Dashboard::build(&calm, &calm, now(), Duration::hours(48));
        let text = DashboardReport {
            dashboard: &dashboard,
            horizon: ForecastHorizon::FiveDays,
        }
        .to_string();

        assert!(text.contains("No warnings of high wind in the next 5 days."));
        assert!(text.contains("No high wind warnings in the last 48 hours."));
    }

    #[test]
    fn test_failed_display_report() {
        let state = DisplayState::failed(&GustError::rate_limit(
            "Rate limit reached (360 calls/day on free tier). Try later.",
        ));
        let text = DisplayReport {
            state: &state,
            horizon: ForecastHorizon::FortyEightHours,
        }
        .to_string();

        assert!(text.contains("Rate limit reached"));
        assert!(text.contains("Current gust: -- [neutral]"));
        assert!(text.contains("No data yet"));
        assert!(text.contains("No forecast data available."));
    }
}
