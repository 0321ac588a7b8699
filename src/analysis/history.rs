//! History loader
//!
//! Groups a user's raw test results into per-test chronological series.
//! Validation is explicit: a row with a non-numeric value or unparseable
//! date is skipped, never aborting the batch.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::TestResult;

/// One dated observation in a test's series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Parse an ISO date, tolerating a trailing time component
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next().unwrap_or(raw).trim();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse a numeric value, rejecting NaN and infinities
fn parse_value(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}

/// Group results into per-test series ordered by date.
///
/// Rows that fail validation are dropped silently; ties on date keep
/// insertion order.
pub fn group_by_test(results: &[TestResult]) -> BTreeMap<String, Vec<SeriesPoint>> {
    let mut series: BTreeMap<String, Vec<SeriesPoint>> = BTreeMap::new();

    for result in results {
        let date = match parse_date(&result.date) {
            Some(d) => d,
            None => continue,
        };
        let value = match parse_value(&result.value) {
            Some(v) => v,
            None => continue,
        };

        series
            .entry(result.test_name.clone())
            .or_default()
            .push(SeriesPoint { date, value });
    }

    for points in series.values_mut() {
        points.sort_by_key(|p| p.date);
    }

    series
}

/// Latest raw value per test: the row with the greatest parseable date.
///
/// Values are kept as stored (unparsed); rows with an empty value or
/// unparseable date are ignored. The earliest-inserted row wins a date tie.
pub fn latest_raw_values(results: &[TestResult]) -> BTreeMap<String, String> {
    let mut latest: BTreeMap<String, (NaiveDate, String)> = BTreeMap::new();

    for result in results {
        if result.value.trim().is_empty() {
            continue;
        }
        let date = match parse_date(&result.date) {
            Some(d) => d,
            None => continue,
        };

        match latest.get(&result.test_name) {
            Some((current, _)) if date <= *current => {}
            _ => {
                latest.insert(result.test_name.clone(), (date, result.value.clone()));
            }
        }
    }

    latest
        .into_iter()
        .map(|(test, (_, value))| (test, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(test: &str, value: &str, date: &str) -> TestResult {
        TestResult {
            id: 0,
            user_id: "u1".into(),
            test_name: test.into(),
            value: value.into(),
            date: date.into(),
            created_at: String::new(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_groups_and_sorts_by_date() {
        let results = vec![
            result("Hemoglobin", "14.2", "2025-03-01"),
            result("Glucose", "95", "2025-02-10"),
            result("Hemoglobin", "13.1", "2025-01-15"),
        ];

        let series = group_by_test(&results);
        assert_eq!(series.len(), 2);

        let hgb = &series["Hemoglobin"];
        assert_eq!(hgb.len(), 2);
        assert_eq!(hgb[0], SeriesPoint { date: date("2025-01-15"), value: 13.1 });
        assert_eq!(hgb[1], SeriesPoint { date: date("2025-03-01"), value: 14.2 });
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let results = vec![
            result("Glucose", "ninety-five", "2025-02-10"),
            result("Glucose", "95", "not-a-date"),
            result("Glucose", "NaN", "2025-02-10"),
            result("Glucose", "96", "2025-02-11"),
        ];

        let series = group_by_test(&results);
        assert_eq!(series["Glucose"].len(), 1);
        assert_eq!(series["Glucose"][0].value, 96.0);
    }

    #[test]
    fn test_datetime_suffix_tolerated() {
        let results = vec![result("Glucose", "95", "2025-02-10T08:30:00Z")];
        let series = group_by_test(&results);
        assert_eq!(series["Glucose"][0].date, date("2025-02-10"));
    }

    #[test]
    fn test_all_malformed_yields_no_series() {
        let results = vec![result("Glucose", "", "2025-02-10")];
        let series = group_by_test(&results);
        assert!(series.is_empty());
    }

    #[test]
    fn test_latest_raw_values_picks_newest_date() {
        let results = vec![
            result("Glucose", "95", "2025-02-10"),
            result("Glucose", "pending", "2025-03-01"),
            result("Glucose", "90", "2025-01-05"),
            result("Hemoglobin", "14.2", "bad-date"),
        ];

        let latest = latest_raw_values(&results);
        assert_eq!(latest.len(), 1);
        // Raw values are kept even when non-numeric
        assert_eq!(latest["Glucose"], "pending");
    }

    #[test]
    fn test_latest_raw_values_date_tie_keeps_first() {
        let results = vec![
            result("Glucose", "95", "2025-02-10"),
            result("Glucose", "96", "2025-02-10"),
        ];

        let latest = latest_raw_values(&results);
        assert_eq!(latest["Glucose"], "95");
    }
}
