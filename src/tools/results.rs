//! Test result MCP tools
//!
//! Recording and listing raw observations. Results are immutable; the only
//! mutation is deletion of a mistaken entry.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::{TestResult, TestResultCreate};

/// Response for add_test_result
#[derive(Debug, Serialize)]
pub struct AddTestResultResponse {
    pub id: i64,
    pub user_id: String,
    pub test_name: String,
    pub value: String,
    pub date: String,
    pub created_at: String,
}

/// Test result summary for listing
#[derive(Debug, Serialize)]
pub struct TestResultSummary {
    pub id: i64,
    pub test_name: String,
    pub value: String,
    pub date: String,
}

impl From<&TestResult> for TestResultSummary {
    fn from(result: &TestResult) -> Self {
        Self {
            id: result.id,
            test_name: result.test_name.clone(),
            value: result.value.clone(),
            date: result.date.clone(),
        }
    }
}

/// Response for list_test_results
#[derive(Debug, Serialize)]
pub struct ListTestResultsResponse {
    pub user_id: String,
    pub results: Vec<TestResultSummary>,
    pub total: usize,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Record a new test result.
///
/// The date must be an ISO date; the value is stored as given (imported
/// data may carry non-numeric values, which analysis skips later).
pub fn add_test_result(
    db: &Database,
    user_id: &str,
    test_name: &str,
    value: &str,
    date: &str,
) -> Result<AddTestResultResponse, String> {
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(format!("Invalid date '{}': expected YYYY-MM-DD", date));
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let result = TestResult::create(
        &conn,
        &TestResultCreate {
            user_id: user_id.to_string(),
            test_name: test_name.to_string(),
            value: value.to_string(),
            date: date.to_string(),
        },
    )
    .map_err(|e| format!("Failed to record test result: {}", e))?;

    Ok(AddTestResultResponse {
        id: result.id,
        user_id: result.user_id,
        test_name: result.test_name,
        value: result.value,
        date: result.date,
        created_at: result.created_at,
    })
}

/// List a user's test results, optionally filtered by test name
pub fn list_test_results(
    db: &Database,
    user_id: &str,
    test_name: Option<&str>,
) -> Result<ListTestResultsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let results = match test_name {
        Some(test) => TestResult::list_for_user_test(&conn, user_id, test),
        None => TestResult::list_for_user(&conn, user_id),
    }
    .map_err(|e| format!("Failed to list test results: {}", e))?;

    let summaries: Vec<TestResultSummary> = results.iter().map(TestResultSummary::from).collect();
    let total = summaries.len();

    Ok(ListTestResultsResponse {
        user_id: user_id.to_string(),
        results: summaries,
        total,
    })
}

/// Delete a test result
pub fn delete_test_result(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = TestResult::delete(&conn, id)
        .map_err(|e| format!("Failed to delete test result: {}", e))?;

    Ok(DeleteResponse {
        success,
        deleted_id: id,
    })
}
