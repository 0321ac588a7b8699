//! Labwatch Library
//!
//! Core functionality for medical test monitoring, prediction, and reporting.

pub mod analysis;
pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
