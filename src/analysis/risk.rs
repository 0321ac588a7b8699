//! Risk scorer
//!
//! Aggregates Low/High outcomes across a set of test values into a 0-100
//! health score with a band label and narrative message. Also extracts the
//! distinct care guides for a set of tests.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{round2, RangeSource};

/// Points contributed by a Low result
const LOW_POINTS: f64 = 1.0;
/// Points contributed by a High result
const HIGH_POINTS: f64 = 2.0;
/// Maximum points any single test can contribute
const MAX_POINTS_PER_TEST: f64 = 2.0;

/// Risk band derived from the health score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    fn of(health_score: f64) -> Self {
        if health_score >= 80.0 {
            RiskBand::Low
        } else if health_score >= 50.0 {
            RiskBand::Moderate
        } else {
            RiskBand::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low Risk (Healthy)",
            RiskBand::Moderate => "Moderate Risk (Needs Attention)",
            RiskBand::High => "High Risk (Critical Condition)",
        }
    }

    fn message(&self, health_score: f64) -> String {
        match self {
            RiskBand::Low => format!(
                "Your health score is {:.2}%, indicating good health. Keep monitoring periodically.",
                health_score
            ),
            RiskBand::Moderate => format!(
                "Your health score is {:.2}%, which indicates you should follow up with your healthcare provider.",
                health_score
            ),
            RiskBand::High => format!(
                "Your health score is {:.2}%, indicating a critical health risk. Immediate medical attention is advised.",
                health_score
            ),
        }
    }
}

/// Aggregate risk over a set of test values
#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    pub abnormal_count: i64,
    pub health_score: f64,
    pub status: String,
    pub message: String,
}

/// Score a set of (test_name, raw value) pairs.
///
/// Entries with a non-numeric value, unknown test, or incomplete range are
/// skipped from the numerator, but the denominator stays at two points per
/// requested entry.
pub fn calculate_risk(entries: &[(String, String)], ranges: &impl RangeSource) -> RiskSummary {
    let max_points = entries.len() as f64 * MAX_POINTS_PER_TEST;
    let mut total_points = 0.0;
    let mut abnormal_count = 0i64;

    for (test_name, raw_value) in entries {
        let value = match raw_value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => continue,
        };

        let range = match ranges.range_for(test_name) {
            Some(r) => r,
            None => continue,
        };
        let (min, max) = match range.bounds() {
            Some(b) => b,
            None => continue,
        };

        if value < min {
            total_points += LOW_POINTS;
            abnormal_count += 1;
        } else if value > max {
            total_points += HIGH_POINTS;
            abnormal_count += 1;
        }
    }

    let risk_score = if max_points > 0.0 {
        total_points / max_points * 100.0
    } else {
        0.0
    };
    let health_score = round2(100.0 - risk_score);
    let band = RiskBand::of(health_score);

    RiskSummary {
        abnormal_count,
        health_score,
        status: band.label().to_string(),
        message: band.message(health_score),
    }
}

/// Distinct non-empty care guides for a set of tests, sorted for
/// deterministic output
pub fn unique_care_guides<'a, I>(test_names: I, ranges: &impl RangeSource) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut guides = BTreeSet::new();

    for test_name in test_names {
        if let Some(range) = ranges.range_for(test_name) {
            if let Some(guide) = range.care_guide {
                if !guide.is_empty() {
                    guides.insert(guide);
                }
            }
        }
    }

    guides.into_iter().collect()
}
