//! Labwatch MCP Server Implementation
//!
//! Exposes the profile, test result, reference range, analysis, and report
//! tools over MCP.

use std::path::PathBuf;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;

use crate::db::Database;
use crate::models::ReferenceRangeUpsert;
use crate::tools::{profile, ranges, reports, results, scoring, trends};

/// Labwatch MCP Service
#[derive(Clone)]
pub struct LabwatchService {
    database: Database,
    /// Default directory for generated reports, next to the database file
    report_dir: PathBuf,
    tool_router: ToolRouter<LabwatchService>,
}

impl LabwatchService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        let report_dir = database_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reports");

        Self {
            database,
            report_dir,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetUserProfileParams {
    /// User identifier the profile and test results are keyed on
    pub user_id: String,
    /// Patient name displayed on reports
    pub name: String,
    /// Age in years (optional)
    pub age: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetUserProfileParams {
    pub user_id: String,
}

// ============================================================================
// Test Result Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddTestResultParams {
    pub user_id: String,
    /// Test name, matched case-sensitively against reference ranges
    pub test_name: String,
    /// Observed value. Usually numeric; non-numeric values are stored but
    /// skipped by analysis
    pub value: String,
    /// Observation date in ISO format: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListTestResultsParams {
    pub user_id: String,
    /// Filter to one test (optional)
    pub test_name: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteTestResultParams {
    /// Test result ID to delete
    pub id: i64,
}

// ============================================================================
// Reference Range Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetReferenceRangeParams {
    pub test_name: String,
    /// Lower bound of the normal range
    pub min_value: Option<f64>,
    /// Upper bound of the normal range
    pub max_value: Option<f64>,
    /// General information shown on reports
    pub health_information: Option<String>,
    /// What low values may indicate
    pub low_values_indicate: Option<String>,
    /// What high values may indicate
    pub high_values_indicate: Option<String>,
    /// Treatment guidance for abnormal values
    pub treatment_guide: Option<String>,
    /// Specialist to consult for low values
    pub low_specialization: Option<String>,
    /// Specialist to consult for high values
    pub high_specialization: Option<String>,
    /// Day-to-day care guidance
    pub care_guide: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetReferenceRangeParams {
    pub test_name: String,
}

// ============================================================================
// Analysis Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserIdParams {
    pub user_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifyTestParams {
    /// Test name with a stored reference range
    pub test_name: String,
    /// Value to classify
    pub value: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateReportParams {
    pub user_id: String,
    /// Output PDF path. Defaults to <db dir>/reports/<user_id>_medical_report.pdf
    pub output_path: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl LabwatchService {
    // --- Profiles ---

    #[tool(description = "Create or update a user profile (name and age shown on reports)")]
    fn set_user_profile(
        &self,
        Parameters(p): Parameters<SetUserProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = profile::set_user_profile(&self.database, &p.user_id, &p.name, p.age)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get a user profile by ID")]
    fn get_user_profile(
        &self,
        Parameters(p): Parameters<GetUserProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = profile::get_user_profile(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => to_json_result(&profile),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "User not found", "user_id": "{}"}}"#,
                p.user_id
            ))])),
        }
    }

    // --- Test Results ---

    #[tool(description = "Record a test result observation for a user (value and ISO date)")]
    fn add_test_result(
        &self,
        Parameters(p): Parameters<AddTestResultParams>,
    ) -> Result<CallToolResult, McpError> {
        let result =
            results::add_test_result(&self.database, &p.user_id, &p.test_name, &p.value, &p.date)
                .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List a user's test results, optionally filtered by test name")]
    fn list_test_results(
        &self,
        Parameters(p): Parameters<ListTestResultsParams>,
    ) -> Result<CallToolResult, McpError> {
        let result =
            results::list_test_results(&self.database, &p.user_id, p.test_name.as_deref())
                .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Delete a test result by ID")]
    fn delete_test_result(
        &self,
        Parameters(p): Parameters<DeleteTestResultParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = results::delete_test_result(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Reference Ranges ---

    #[tool(description = "Create or update the reference range and narrative guidance for a test")]
    fn set_reference_range(
        &self,
        Parameters(p): Parameters<SetReferenceRangeParams>,
    ) -> Result<CallToolResult, McpError> {
        let data = ReferenceRangeUpsert {
            test_name: p.test_name,
            min_value: p.min_value,
            max_value: p.max_value,
            health_information: p.health_information,
            low_values_indicate: p.low_values_indicate,
            high_values_indicate: p.high_values_indicate,
            treatment_guide: p.treatment_guide,
            low_specialization: p.low_specialization,
            high_specialization: p.high_specialization,
            care_guide: p.care_guide,
        };
        let result = ranges::set_reference_range(&self.database, &data)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get the reference range for a test")]
    fn get_reference_range(
        &self,
        Parameters(p): Parameters<GetReferenceRangeParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = ranges::get_reference_range(&self.database, &p.test_name)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(range) => to_json_result(&range),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Reference range not found", "test_name": "{}"}}"#,
                p.test_name
            ))])),
        }
    }

    #[tool(description = "List all reference ranges")]
    fn list_reference_ranges(&self) -> Result<CallToolResult, McpError> {
        let result = ranges::list_reference_ranges(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Analysis ---

    #[tool(description = "Analyze per-test trends across a user's history: direction, range position, and monitoring priority")]
    fn analyze_trends(
        &self,
        Parameters(p): Parameters<UserIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = trends::analyze_trends(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Project each of a user's tests 30 days ahead using a linear fit over its history")]
    fn predict_values(
        &self,
        Parameters(p): Parameters<UserIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = trends::predict_values(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Classify a single test value against its reference range, with narrative guidance and retest advice")]
    fn classify_test(
        &self,
        Parameters(p): Parameters<ClassifyTestParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = scoring::classify_test(&self.database, &p.test_name, p.value)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Compute a 0-100 health score from a user's latest test values")]
    fn health_score(
        &self,
        Parameters(p): Parameters<UserIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = scoring::health_score(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List the distinct care guides for the tests a user tracks")]
    fn care_guides(
        &self,
        Parameters(p): Parameters<UserIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = scoring::care_guides(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Reports ---

    #[tool(description = "Generate the comprehensive PDF medical report for a user: per-test charts, abnormal-result guidance, risk summary, and care guides")]
    fn generate_report(
        &self,
        Parameters(p): Parameters<GenerateReportParams>,
    ) -> Result<CallToolResult, McpError> {
        let output_path = match p.output_path {
            Some(path) => path,
            None => self
                .report_dir
                .join(format!("{}_medical_report.pdf", p.user_id))
                .to_string_lossy()
                .into_owned(),
        };

        let result = reports::generate_report(&self.database, &p.user_id, &output_path)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for LabwatchService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "labwatch".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Labwatch Medical Test Monitor".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Labwatch - Medical test result tracking and analysis. \
                 Profiles: set/get_user_profile. \
                 Results: add/list/delete_test_result (value plus YYYY-MM-DD date). \
                 Reference ranges: set/get/list_reference_range(s) with narrative guidance fields. \
                 Analysis: analyze_trends (direction and monitoring priority per test), \
                 predict_values (30-day linear projection), classify_test (Low/Normal/High \
                 with specialist and retest advice), health_score (0-100), care_guides. \
                 Reports: generate_report writes a PDF with per-test range charts, a risk \
                 summary, and care guides. Set the user profile before generating a report."
                    .into(),
            ),
        }
    }
}
