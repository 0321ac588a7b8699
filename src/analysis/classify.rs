//! Classifier
//!
//! Classifies a single test value against its reference range, estimates
//! time to normalize, and recommends a retest interval and specialist.
//! Pure function: identical inputs always produce identical records.

use serde::Serialize;

use crate::models::ReferenceRange;

/// Fraction of the normal-range width assumed to close per day when
/// estimating time to normalize
const DAILY_CHANGE_FRACTION: f64 = 0.015;

/// Floor for the time-to-normal estimate, in days
const MIN_ESTIMATED_DAYS: i64 = 3;

pub const DEFAULT_SPECIALIZATION: &str = "General Physician";

const FALLBACK_LOW_INDICATION: &str = "Low values may indicate an issue.";
const FALLBACK_HIGH_INDICATION: &str = "High values may indicate an issue.";
const FALLBACK_TREATMENT: &str = "Consult a doctor for further evaluation.";
const FALLBACK_HEALTH_INFO: &str = "No additional health information available.";

/// Classification outcome. Boundaries are inclusive to the range: a value
/// exactly at min or max is Normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestOutcome {
    Low,
    Normal,
    High,
}

impl TestOutcome {
    fn of(value: f64, min: f64, max: f64) -> Self {
        if value < min {
            TestOutcome::Low
        } else if value > max {
            TestOutcome::High
        } else {
            TestOutcome::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestOutcome::Low => "Low",
            TestOutcome::Normal => "Normal",
            TestOutcome::High => "High",
        }
    }

    pub fn is_abnormal(&self) -> bool {
        !matches!(self, TestOutcome::Normal)
    }
}

/// Full classification of one (test, value) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRecord {
    pub test_name: String,
    pub value: f64,
    pub result: TestOutcome,
    pub indication: String,
    pub treatment_guide: String,
    pub specialization: String,
    pub time_to_normal: String,
    pub retest_recommendation: String,
    pub health_information: String,
}

/// Format a day count as "N days" below 30, "M months[ and D days]" above
fn format_duration(days: i64) -> String {
    if days >= 30 {
        let months = days / 30;
        let rem = days % 30;
        let mut text = format!("{} month{}", months, if months > 1 { "s" } else { "" });
        if rem > 0 {
            text.push_str(&format!(" and {} days", rem));
        }
        text
    } else {
        format!("{} day{}", days, if days > 1 { "s" } else { "" })
    }
}

/// Estimated-time-to-normal narrative for an abnormal value
fn time_to_normal(outcome: TestOutcome, value: f64, min: f64, max: f64) -> String {
    let midpoint = (min + max) / 2.0;
    let deviation = (value - midpoint).abs();
    let daily_change_rate = DAILY_CHANGE_FRACTION * (max - min);

    if daily_change_rate <= 0.0 {
        return "Unable to estimate time-to-normal due to insufficient data.".to_string();
    }

    let estimated_days = ((deviation / daily_change_rate) as i64).max(MIN_ESTIMATED_DAYS);
    let time_text = format_duration(estimated_days);

    match outcome {
        TestOutcome::Low => format!(
            "With proper management, levels may normalize in approximately {}.",
            time_text
        ),
        _ => format!(
            "If the current trend continues, value may stabilize within {}.",
            time_text
        ),
    }
}

/// Classify a value against its reference range.
///
/// Returns None when the range is missing either bound. Narrative fields
/// come verbatim from the range record, with fixed fallbacks when absent.
pub fn classify(test_name: &str, value: f64, range: &ReferenceRange) -> Option<ClassificationRecord> {
    let (min, max) = range.bounds()?;
    let result = TestOutcome::of(value, min, max);

    let (indication, treatment_guide) = match result {
        TestOutcome::Low => (
            range
                .low_values_indicate
                .clone()
                .unwrap_or_else(|| FALLBACK_LOW_INDICATION.to_string()),
            range
                .treatment_guide
                .clone()
                .unwrap_or_else(|| FALLBACK_TREATMENT.to_string()),
        ),
        TestOutcome::High => (
            range
                .high_values_indicate
                .clone()
                .unwrap_or_else(|| FALLBACK_HIGH_INDICATION.to_string()),
            range
                .treatment_guide
                .clone()
                .unwrap_or_else(|| FALLBACK_TREATMENT.to_string()),
        ),
        TestOutcome::Normal => (
            "Within healthy range.".to_string(),
            "No treatment required.".to_string(),
        ),
    };

    let specialization = match result {
        TestOutcome::High => range.high_specialization.clone(),
        _ => range.low_specialization.clone(),
    }
    .unwrap_or_else(|| DEFAULT_SPECIALIZATION.to_string());

    let time_to_normal = if result.is_abnormal() {
        time_to_normal(result, value, min, max)
    } else {
        "Test result is within the normal range.".to_string()
    };

    let retest_recommendation = if result.is_abnormal() {
        "Trending poorly - retest in 14 days.".to_string()
    } else {
        "No immediate concern, retest in 90 days.".to_string()
    };

    Some(ClassificationRecord {
        test_name: test_name.to_string(),
        value,
        result,
        indication,
        treatment_guide,
        specialization,
        time_to_normal,
        retest_recommendation,
        health_information: range
            .health_information
            .clone()
            .unwrap_or_else(|| FALLBACK_HEALTH_INFO.to_string()),
    })
}
