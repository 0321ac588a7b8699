//! Predictor
//!
//! Ordinary-least-squares fit over (days since first observation, value),
//! extrapolated 30 days past the latest observation.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::Serialize;

use super::history::SeriesPoint;
use super::{round2, RangeSource};

/// How far past the latest observation the projection lands
pub const PREDICTION_HORIZON_DAYS: i64 = 30;

pub const MSG_INSUFFICIENT_DATA: &str =
    "Insufficient historical data for prediction (need at least 2 data points).";
pub const MSG_RANGE_NOT_FOUND: &str = "Test not found in reference data.";

/// Least-squares line fit y = slope * x + intercept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit over paired samples. Returns None for fewer than two points,
    /// mismatched lengths, or zero variance in x (undefined slope).
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }

        let n = xs.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = ys.iter().sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let dx = x - x_mean;
            sxx += dx * dx;
            sxy += dx * (y - y_mean);
        }

        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        Some(Self { slope, intercept })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Projection for one test: either a value and date, or an informational
/// message when no projection could be made
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub test_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PredictionRecord {
    fn info(test_name: &str, message: &str) -> Self {
        Self {
            test_name: test_name.to_string(),
            predicted_value: None,
            prediction_date: None,
            message: Some(message.to_string()),
        }
    }
}

/// Project one test's series 30 days past its latest observation.
///
/// A degenerate series (all observations on one day) has no defined slope
/// and is reported as insufficient data.
pub fn predict_series(test_name: &str, points: &[SeriesPoint]) -> PredictionRecord {
    if points.len() < 2 {
        return PredictionRecord::info(test_name, MSG_INSUFFICIENT_DATA);
    }

    let first = points[0].date;
    let xs: Vec<f64> = points
        .iter()
        .map(|p| (p.date - first).num_days() as f64)
        .collect();
    let ys: Vec<f64> = points.iter().map(|p| p.value).collect();

    let fit = match LinearFit::fit(&xs, &ys) {
        Some(fit) => fit,
        None => return PredictionRecord::info(test_name, MSG_INSUFFICIENT_DATA),
    };

    let latest = points[points.len() - 1].date;
    let target_date = latest + Duration::days(PREDICTION_HORIZON_DAYS);
    let target_x = (target_date - first).num_days() as f64;

    PredictionRecord {
        test_name: test_name.to_string(),
        predicted_value: Some(round2(fit.predict(target_x))),
        prediction_date: Some(target_date.format("%Y-%m-%d").to_string()),
        message: None,
    }
}

/// Project every series of a user's grouped history.
///
/// Tests with too little data or no reference range get informational
/// records rather than being dropped.
pub fn predict_all(
    series: &BTreeMap<String, Vec<SeriesPoint>>,
    ranges: &impl RangeSource,
) -> Vec<PredictionRecord> {
    let mut records = Vec::new();

    for (test_name, points) in series {
        if points.len() < 2 {
            records.push(PredictionRecord::info(test_name, MSG_INSUFFICIENT_DATA));
            continue;
        }
        if ranges.range_for(test_name).is_none() {
            records.push(PredictionRecord::info(test_name, MSG_RANGE_NOT_FOUND));
            continue;
        }
        records.push(predict_series(test_name, points));
    }

    records
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::analysis::testutil::{range, RangeMap};

    fn point(date: &str, value: f64) -> SeriesPoint {
        SeriesPoint {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            value,
        }
    }

    #[test]
    fn test_fit_recovers_exact_line() {
        let fit = LinearFit::fit(&[0.0, 30.0], &[10.0, 20.0]).unwrap();
        assert!((fit.slope - 10.0 / 30.0).abs() < 1e-12);
        assert!((fit.intercept - 10.0).abs() < 1e-12);
        assert!((fit.predict(60.0) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_rejects_zero_x_variance() {
        assert!(LinearFit::fit(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn test_two_point_projection() {
        // (d0, v0), (d0+30, v0+10) -> slope 10/30, +30 days = v0 + 20
        let points = [point("2025-01-01", 10.0), point("2025-01-31", 20.0)];
        let record = predict_series("G", &points);

        assert_eq!(record.predicted_value, Some(30.0));
        assert_eq!(record.prediction_date.as_deref(), Some("2025-03-02"));
        assert!(record.message.is_none());
    }

    #[test]
    fn test_projection_rounds_to_two_decimals() {
        // slope 1/3 per day, 30-day horizon from the latest point
        let points = [point("2025-01-01", 0.0), point("2025-01-04", 1.0)];
        let record = predict_series("G", &points);
        // predicted at x = 33: 11.0
        assert_eq!(record.predicted_value, Some(11.0));

        let points = [point("2025-01-01", 0.0), point("2025-01-08", 1.0)];
        let record = predict_series("G", &points);
        // slope 1/7, x = 37 -> 5.2857... -> 5.29
        assert_eq!(record.predicted_value, Some(5.29));
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let record = predict_series("G", &[point("2025-01-01", 10.0)]);
        assert_eq!(record.message.as_deref(), Some(MSG_INSUFFICIENT_DATA));
        assert!(record.predicted_value.is_none());
    }

    #[test]
    fn test_same_day_observations_are_insufficient() {
        let points = [point("2025-01-01", 10.0), point("2025-01-01", 12.0)];
        let record = predict_series("G", &points);
        assert_eq!(record.message.as_deref(), Some(MSG_INSUFFICIENT_DATA));
    }

    #[test]
    fn test_predict_all_reports_missing_range() {
        let mut series = BTreeMap::new();
        series.insert(
            "Known".to_string(),
            vec![point("2025-01-01", 10.0), point("2025-01-31", 20.0)],
        );
        series.insert(
            "Unknown".to_string(),
            vec![point("2025-01-01", 10.0), point("2025-01-31", 20.0)],
        );

        let ranges = RangeMap::default().with(range("Known", 0.0, 100.0));
        let records = predict_all(&series, &ranges);
        assert_eq!(records.len(), 2);

        let known = records.iter().find(|r| r.test_name == "Known").unwrap();
        assert!(known.predicted_value.is_some());

        let unknown = records.iter().find(|r| r.test_name == "Unknown").unwrap();
        assert_eq!(unknown.message.as_deref(), Some(MSG_RANGE_NOT_FOUND));
    }
}
