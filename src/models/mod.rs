//! Data models
//!
//! Rust structs representing database entities.

mod reference_range;
mod test_result;
mod user;

pub use reference_range::{ReferenceRange, ReferenceRangeUpsert};
pub use test_result::{TestResult, TestResultCreate};
pub use user::UserProfile;
