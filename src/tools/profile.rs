//! User profile MCP tools

use serde::Serialize;

use crate::db::Database;
use crate::models::UserProfile;

/// Response for set_user_profile and get_user_profile
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub name: String,
    pub age: Option<i64>,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id,
            name: profile.name,
            age: profile.age,
            updated_at: profile.updated_at,
        }
    }
}

/// Set or update a user profile
pub fn set_user_profile(
    db: &Database,
    user_id: &str,
    name: &str,
    age: Option<i64>,
) -> Result<ProfileResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = UserProfile::set(&conn, user_id, name, age)
        .map_err(|e| format!("Failed to set user profile: {}", e))?;

    Ok(profile.into())
}

/// Get a user profile by ID
pub fn get_user_profile(db: &Database, user_id: &str) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = UserProfile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get user profile: {}", e))?;

    Ok(profile.map(ProfileResponse::from))
}
