//! Trend analyzer
//!
//! Compares the latest value of each test to the immediately preceding one
//! and to the reference range, and assigns a monitoring priority.

use std::collections::BTreeMap;

use serde::Serialize;

use super::history::SeriesPoint;
use super::RangeSource;

/// Relative change above which an out-of-range value is escalated
const CRITICAL_CHANGE_FRACTION: f64 = 0.2;

/// Trend status used when a test has fewer than two observations
pub const NO_HISTORY_STATUS: &str = "No Historical Data";

/// Direction of change between the two most recent observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    fn of(current: f64, previous: f64) -> Self {
        if current > previous {
            TrendDirection::Increasing
        } else if current < previous {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "Increasing (Possible Worsening)",
            TrendDirection::Decreasing => "Decreasing (Possible Improvement)",
            TrendDirection::Stable => "Stable (No Change)",
        }
    }
}

/// Where the latest value sits relative to the reference range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePosition {
    Below,
    Above,
    Within,
}

impl RangePosition {
    fn of(value: f64, min: f64, max: f64) -> Self {
        if value < min {
            RangePosition::Below
        } else if value > max {
            RangePosition::Above
        } else {
            RangePosition::Within
        }
    }

    pub fn qualifier(&self) -> &'static str {
        match self {
            RangePosition::Below => "(Below Normal)",
            RangePosition::Above => "(Above Normal)",
            RangePosition::Within => "(Within Normal Range)",
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        !matches!(self, RangePosition::Within)
    }
}

/// Recommended follow-up cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitoringPriority {
    Critical,
    Warning,
    Stable,
}

impl MonitoringPriority {
    pub fn label(&self) -> &'static str {
        match self {
            MonitoringPriority::Critical => "Critical, monitor weekly",
            MonitoringPriority::Warning => "Warning, monitor monthly",
            MonitoringPriority::Stable => "Stable, monitor every 3 months",
        }
    }
}

/// Derived trend for one test
#[derive(Debug, Clone, Serialize)]
pub struct TrendRecord {
    pub test_name: String,
    pub current_value: f64,
    pub past_values: Vec<f64>,
    pub trend_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitoring_priority: Option<String>,
}

/// Analyze one test's chronological series against its reference bounds.
///
/// A single observation yields a "No Historical Data" record regardless of
/// the range. With history present, a missing range skips the test
/// entirely (returns None).
pub fn analyze_series(
    test_name: &str,
    points: &[SeriesPoint],
    bounds: Option<(f64, f64)>,
) -> Option<TrendRecord> {
    let current = points.last()?;

    if points.len() < 2 {
        return Some(TrendRecord {
            test_name: test_name.to_string(),
            current_value: current.value,
            past_values: Vec::new(),
            trend_status: NO_HISTORY_STATUS.to_string(),
            monitoring_priority: None,
        });
    }

    let (min, max) = bounds?;

    let past_values: Vec<f64> = points[..points.len() - 1].iter().map(|p| p.value).collect();
    let previous = points[points.len() - 2].value;

    let direction = TrendDirection::of(current.value, previous);
    let position = RangePosition::of(current.value, min, max);
    let trend_status = format!("{} {}", direction.label(), position.qualifier());

    let priority = if position.is_out_of_range() {
        if (current.value - previous).abs() > CRITICAL_CHANGE_FRACTION * previous {
            MonitoringPriority::Critical
        } else {
            MonitoringPriority::Warning
        }
    } else {
        MonitoringPriority::Stable
    };

    Some(TrendRecord {
        test_name: test_name.to_string(),
        current_value: current.value,
        past_values,
        trend_status,
        monitoring_priority: Some(priority.label().to_string()),
    })
}

/// Analyze every series of a user's grouped history
pub fn analyze_trends(
    series: &BTreeMap<String, Vec<SeriesPoint>>,
    ranges: &impl RangeSource,
) -> Vec<TrendRecord> {
    let mut records = Vec::new();

    for (test_name, points) in series {
        if points.is_empty() {
            continue;
        }
        let bounds = ranges.range_for(test_name).and_then(|r| r.bounds());
        if let Some(record) = analyze_series(test_name, points, bounds) {
            records.push(record);
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::analysis::testutil::{range, RangeMap};

    fn point(day: u32, value: f64) -> SeriesPoint {
        SeriesPoint {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            value,
        }
    }

    #[test]
    fn test_single_point_has_no_priority() {
        let record = analyze_series("Glucose", &[point(1, 95.0)], Some((70.0, 100.0))).unwrap();
        assert_eq!(record.trend_status, NO_HISTORY_STATUS);
        assert!(record.monitoring_priority.is_none());
        assert!(record.past_values.is_empty());
        assert_eq!(record.current_value, 95.0);
    }

    #[test]
    fn test_single_point_emitted_without_range() {
        let record = analyze_series("Glucose", &[point(1, 95.0)], None).unwrap();
        assert_eq!(record.trend_status, NO_HISTORY_STATUS);
    }

    #[test]
    fn test_history_without_range_is_skipped() {
        let points = [point(1, 95.0), point(8, 97.0)];
        assert!(analyze_series("Glucose", &points, None).is_none());
    }

    #[test]
    fn test_direction_follows_sign_of_change() {
        let bounds = Some((70.0, 100.0));

        let up = analyze_series("G", &[point(1, 90.0), point(8, 95.0)], bounds).unwrap();
        assert!(up.trend_status.starts_with("Increasing (Possible Worsening)"));

        let down = analyze_series("G", &[point(1, 95.0), point(8, 90.0)], bounds).unwrap();
        assert!(down.trend_status.starts_with("Decreasing (Possible Improvement)"));

        let flat = analyze_series("G", &[point(1, 95.0), point(8, 95.0)], bounds).unwrap();
        assert!(flat.trend_status.starts_with("Stable (No Change)"));
    }

    #[test]
    fn test_range_qualifier_appended() {
        let bounds = Some((70.0, 100.0));

        let below = analyze_series("G", &[point(1, 80.0), point(8, 65.0)], bounds).unwrap();
        assert_eq!(
            below.trend_status,
            "Decreasing (Possible Improvement) (Below Normal)"
        );

        let above = analyze_series("G", &[point(1, 80.0), point(8, 105.0)], bounds).unwrap();
        assert_eq!(
            above.trend_status,
            "Increasing (Possible Worsening) (Above Normal)"
        );

        let within = analyze_series("G", &[point(1, 80.0), point(8, 90.0)], bounds).unwrap();
        assert_eq!(
            within.trend_status,
            "Increasing (Possible Worsening) (Within Normal Range)"
        );
    }

    #[test]
    fn test_priority_critical_requires_out_of_range_and_large_change() {
        let bounds = Some((70.0, 100.0));

        // Out of range, change 30 > 0.2 * 80 = 16
        let critical = analyze_series("G", &[point(1, 80.0), point(8, 110.0)], bounds).unwrap();
        assert_eq!(
            critical.monitoring_priority.as_deref(),
            Some("Critical, monitor weekly")
        );

        // Out of range, change 6 <= 0.2 * 96 = 19.2
        let warning = analyze_series("G", &[point(1, 96.0), point(8, 102.0)], bounds).unwrap();
        assert_eq!(
            warning.monitoring_priority.as_deref(),
            Some("Warning, monitor monthly")
        );

        // In range, large change still stable
        let stable = analyze_series("G", &[point(1, 72.0), point(8, 99.0)], bounds).unwrap();
        assert_eq!(
            stable.monitoring_priority.as_deref(),
            Some("Stable, monitor every 3 months")
        );
    }

    #[test]
    fn test_only_previous_value_drives_direction() {
        // 90 -> 110 -> 95: decreasing relative to 110 despite earlier rise
        let bounds = Some((70.0, 100.0));
        let record =
            analyze_series("G", &[point(1, 90.0), point(8, 110.0), point(15, 95.0)], bounds)
                .unwrap();
        assert!(record.trend_status.starts_with("Decreasing"));
        assert_eq!(record.past_values, vec![90.0, 110.0]);
    }

    #[test]
    fn test_analyze_trends_skips_unknown_tests() {
        let mut series = BTreeMap::new();
        series.insert("Known".to_string(), vec![point(1, 5.0), point(8, 6.0)]);
        series.insert("Unknown".to_string(), vec![point(1, 5.0), point(8, 6.0)]);

        let ranges = RangeMap::default().with(range("Known", 4.0, 7.0));
        let records = analyze_trends(&series, &ranges);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].test_name, "Known");
    }
}
