//! Gust severity bands and display labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gusts at or above this are a red alert (mph)
pub const ALERT_THRESHOLD_MPH: f64 = 45.0;
/// Gusts at or above this are an amber watch (mph)
pub const AMBER_THRESHOLD_MPH: f64 = 35.0;

/// Severity band for a gust magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No usable gust value
    Neutral,
    /// Below the amber threshold
    Safe,
    /// Between the amber and alert thresholds
    Amber,
    /// At or above the alert threshold
    Danger,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Neutral => "neutral",
            Severity::Safe => "safe",
            Severity::Amber => "amber",
            Severity::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a gust in mph. Each band includes its lower bound.
#[must_use]
pub fn classify(gust: Option<f64>) -> Severity {
    match gust {
        None => Severity::Neutral,
        Some(g) if g.is_nan() => Severity::Neutral,
        Some(g) if g >= ALERT_THRESHOLD_MPH => Severity::Danger,
        Some(g) if g >= AMBER_THRESHOLD_MPH => Severity::Amber,
        Some(_) => Severity::Safe,
    }
}

/// "47 mph", or "--" without a value
#[must_use]
pub fn gust_label(gust: Option<f64>) -> String {
    match gust {
        Some(g) if g.is_finite() => format!("{} mph", round_whole(g)),
        _ => "--".to_string(),
    }
}

/// "Speed: 21 mph", or "Speed: --" without a value
#[must_use]
pub fn speed_label(speed: Option<f64>) -> String {
    match speed {
        Some(s) if s.is_finite() => format!("Speed: {} mph", round_whole(s)),
        _ => "Speed: --".to_string(),
    }
}

pub(crate) fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(44.9), Severity::Amber)]
    #[case(Some(45.0), Severity::Danger)]
    #[case(Some(34.9), Severity::Safe)]
    #[case(Some(35.0), Severity::Amber)]
    #[case(Some(80.0), Severity::Danger)]
    #[case(Some(0.0), Severity::Safe)]
    #[case(Some(-3.0), Severity::Safe)]
    #[case(Some(f64::NAN), Severity::Neutral)]
    #[case(None, Severity::Neutral)]
    fn test_classify(#[case] gust: Option<f64>, #[case] expected: Severity) {
        assert_eq!(classify(gust), expected);
    }

    #[test]
    fn test_gust_label() {
        assert_eq!(gust_label(Some(44.74)), "45 mph");
        assert_eq!(gust_label(Some(0.0)), "0 mph");
        assert_eq!(gust_label(None), "--");
    }

    #[test]
    fn test_speed_label() {
        assert_eq!(speed_label(Some(20.6)), "Speed: 21 mph");
        assert_eq!(speed_label(None), "Speed: --");
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Danger).unwrap();
        assert_eq!(json, "\"danger\"");
    }
}
