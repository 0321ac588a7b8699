//! User profile model
//!
//! Stores per-user identity used in report headers.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// User profile for report headers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub age: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            age: row.get("age")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get a user profile by ID
    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or update a user profile (upsert)
    pub fn set(conn: &Connection, user_id: &str, name: &str, age: Option<i64>) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_profiles (user_id, name, age)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                updated_at = datetime('now')
            "#,
            params![user_id, name, age],
        )?;

        Self::get(conn, user_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_set_and_get_profile() {
        let conn = test_conn();
        let profile = UserProfile::set(&conn, "u1", "Alice Doe", Some(42)).unwrap();
        assert_eq!(profile.name, "Alice Doe");
        assert_eq!(profile.age, Some(42));

        let fetched = UserProfile::get(&conn, "u1").unwrap().unwrap();
        assert_eq!(fetched.name, "Alice Doe");
    }

    #[test]
    fn test_set_is_upsert() {
        let conn = test_conn();
        UserProfile::set(&conn, "u1", "Alice Doe", Some(42)).unwrap();
        let updated = UserProfile::set(&conn, "u1", "Alice Smith", None).unwrap();
        assert_eq!(updated.name, "Alice Smith");
        assert_eq!(updated.age, None);
    }

    #[test]
    fn test_missing_profile_is_none() {
        let conn = test_conn();
        assert!(UserProfile::get(&conn, "nobody").unwrap().is_none());
    }
}
