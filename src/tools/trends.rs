//! Trend and prediction MCP tools
//!
//! Thin orchestration: fetch a user's history, group it, and run the pure
//! analysis functions with the database connection as the range source.

use serde::Serialize;

use crate::analysis::{self, PredictionRecord, TrendRecord};
use crate::db::Database;
use crate::models::TestResult;

/// Response for analyze_trends
#[derive(Debug, Serialize)]
pub struct TrendReportResponse {
    pub user_id: String,
    pub tests: Vec<TrendRecord>,
    pub total: usize,
}

/// Response for predict_values
#[derive(Debug, Serialize)]
pub struct PredictionReportResponse {
    pub user_id: String,
    pub tests: Vec<PredictionRecord>,
    pub total: usize,
}

/// Analyze trends across all of a user's tests
pub fn analyze_trends(db: &Database, user_id: &str) -> Result<TrendReportResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let results = TestResult::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to load test results: {}", e))?;

    let series = analysis::group_by_test(&results);
    let tests = analysis::analyze_trends(&series, &*conn);
    let total = tests.len();

    Ok(TrendReportResponse {
        user_id: user_id.to_string(),
        tests,
        total,
    })
}

/// Project each of a user's tests 30 days past its latest observation
pub fn predict_values(db: &Database, user_id: &str) -> Result<PredictionReportResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let results = TestResult::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to load test results: {}", e))?;

    let series = analysis::group_by_test(&results);
    let tests = analysis::predict_all(&series, &*conn);
    let total = tests.len();

    Ok(PredictionReportResponse {
        user_id: user_id.to_string(),
        tests,
        total,
    })
}
