//! Classification, risk scoring, and care guide MCP tools

use serde::Serialize;

use crate::analysis::{self, ClassificationRecord, RiskSummary};
use crate::db::Database;
use crate::models::{ReferenceRange, TestResult};

pub const MSG_TEST_NOT_FOUND: &str = "Test not found in reference data.";
pub const MSG_INVALID_RANGE: &str = "Invalid test or range values.";

/// Response for health_score
#[derive(Debug, Serialize)]
pub struct HealthScoreResponse {
    pub user_id: String,
    pub tests_considered: usize,
    pub abnormal_count: i64,
    pub health_score: f64,
    pub status: String,
    pub message: String,
}

/// Response for care_guides
#[derive(Debug, Serialize)]
pub struct CareGuidesResponse {
    pub user_id: String,
    pub guides: Vec<String>,
    pub total: usize,
}

/// Classify a single value against the stored reference range
pub fn classify_test(
    db: &Database,
    test_name: &str,
    value: f64,
) -> Result<ClassificationRecord, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let range = ReferenceRange::get_by_name(&conn, test_name)
        .map_err(|e| format!("Failed to get reference range: {}", e))?
        .ok_or_else(|| MSG_TEST_NOT_FOUND.to_string())?;

    analysis::classify(test_name, value, &range).ok_or_else(|| MSG_INVALID_RANGE.to_string())
}

/// Latest value per test for a user, as stored
fn latest_values(db: &Database, user_id: &str) -> Result<Vec<(String, String)>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let results = TestResult::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to load test results: {}", e))?;

    Ok(analysis::latest_raw_values(&results).into_iter().collect())
}

/// Aggregate the user's latest test values into a 0-100 health score
pub fn health_score(db: &Database, user_id: &str) -> Result<HealthScoreResponse, String> {
    let entries = latest_values(db, user_id)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let summary: RiskSummary = analysis::calculate_risk(&entries, &*conn);

    Ok(HealthScoreResponse {
        user_id: user_id.to_string(),
        tests_considered: entries.len(),
        abnormal_count: summary.abnormal_count,
        health_score: summary.health_score,
        status: summary.status,
        message: summary.message,
    })
}

/// Distinct care guides for the user's tracked tests
pub fn care_guides(db: &Database, user_id: &str) -> Result<CareGuidesResponse, String> {
    let entries = latest_values(db, user_id)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let guides =
        analysis::unique_care_guides(entries.iter().map(|(test, _)| test.as_str()), &*conn);
    let total = guides.len();

    Ok(CareGuidesResponse {
        user_id: user_id.to_string(),
        guides,
        total,
    })
}
