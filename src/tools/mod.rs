//! Labwatch Tools module
//!
//! MCP tool implementations for medical test monitoring.

pub mod profile;
pub mod ranges;
pub mod reports;
pub mod results;
pub mod scoring;
pub mod trends;
