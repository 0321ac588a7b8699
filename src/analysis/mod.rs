//! Analysis module
//!
//! Pure derivations over a user's test history: trend analysis, linear
//! prediction, classification against reference ranges, and risk scoring.
//! Reference ranges reach this module only through the [`RangeSource`]
//! lookup, so every function here is testable with an in-memory fake.

pub mod classify;
pub mod history;
pub mod predict;
pub mod risk;
pub mod trend;

pub use classify::{classify, ClassificationRecord, TestOutcome};
pub use history::{group_by_test, latest_raw_values, SeriesPoint};
pub use predict::{predict_all, predict_series, LinearFit, PredictionRecord};
pub use risk::{calculate_risk, unique_care_guides, RiskBand, RiskSummary};
pub use trend::{analyze_series, analyze_trends, MonitoringPriority, TrendRecord};

use crate::models::ReferenceRange;

/// Read-only lookup of reference ranges by test name.
///
/// Implemented for `rusqlite::Connection` in production; tests substitute a
/// hash-map fake.
pub trait RangeSource {
    fn range_for(&self, test_name: &str) -> Option<ReferenceRange>;
}

impl RangeSource for rusqlite::Connection {
    fn range_for(&self, test_name: &str) -> Option<ReferenceRange> {
        match ReferenceRange::get_by_name(self, test_name) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!("reference range lookup failed for '{}': {}", test_name, e);
                None
            }
        }
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::BTreeMap;

    use super::RangeSource;
    use crate::models::ReferenceRange;

    /// In-memory fake for [`RangeSource`]
    #[derive(Default)]
    pub struct RangeMap(pub BTreeMap<String, ReferenceRange>);

    impl RangeMap {
        pub fn with(mut self, range: ReferenceRange) -> Self {
            self.0.insert(range.test_name.clone(), range);
            self
        }
    }

    impl RangeSource for RangeMap {
        fn range_for(&self, test_name: &str) -> Option<ReferenceRange> {
            self.0.get(test_name).cloned()
        }
    }

    /// Bare range record with both bounds set
    pub fn range(test_name: &str, min: f64, max: f64) -> ReferenceRange {
        ReferenceRange {
            test_name: test_name.to_string(),
            min_value: Some(min),
            max_value: Some(max),
            health_information: None,
            low_values_indicate: None,
            high_values_indicate: None,
            treatment_guide: None,
            low_specialization: None,
            high_specialization: None,
            care_guide: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}
