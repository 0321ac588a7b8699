//! Reference range MCP tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{ReferenceRange, ReferenceRangeUpsert};

/// Reference range summary for listing
#[derive(Debug, Serialize)]
pub struct ReferenceRangeSummary {
    pub test_name: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub has_care_guide: bool,
}

impl From<&ReferenceRange> for ReferenceRangeSummary {
    fn from(range: &ReferenceRange) -> Self {
        Self {
            test_name: range.test_name.clone(),
            min_value: range.min_value,
            max_value: range.max_value,
            has_care_guide: range.care_guide.as_deref().is_some_and(|g| !g.is_empty()),
        }
    }
}

/// Response for list_reference_ranges
#[derive(Debug, Serialize)]
pub struct ListReferenceRangesResponse {
    pub ranges: Vec<ReferenceRangeSummary>,
    pub total: usize,
}

/// Set or update a reference range
pub fn set_reference_range(
    db: &Database,
    data: &ReferenceRangeUpsert,
) -> Result<ReferenceRange, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    ReferenceRange::set(&conn, data).map_err(|e| format!("Failed to set reference range: {}", e))
}

/// Get a reference range by test name
pub fn get_reference_range(db: &Database, test_name: &str) -> Result<Option<ReferenceRange>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    ReferenceRange::get_by_name(&conn, test_name)
        .map_err(|e| format!("Failed to get reference range: {}", e))
}

/// List all reference ranges
pub fn list_reference_ranges(db: &Database) -> Result<ListReferenceRangesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let ranges = ReferenceRange::list(&conn)
        .map_err(|e| format!("Failed to list reference ranges: {}", e))?;

    let summaries: Vec<ReferenceRangeSummary> =
        ranges.iter().map(ReferenceRangeSummary::from).collect();
    let total = summaries.len();

    Ok(ListReferenceRangesResponse {
        ranges: summaries,
        total,
    })
}
