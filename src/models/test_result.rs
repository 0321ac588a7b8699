//! Test result model
//!
//! Raw observations as imported from lab reports. Value and date are stored
//! as text and parsed at analysis time, so one malformed row never aborts a
//! batch. Results are immutable once recorded: create, list, delete only.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A single recorded test observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub id: i64,
    pub user_id: String,
    pub test_name: String,
    pub value: String,
    pub date: String,
    pub created_at: String,
}

/// Data for recording a new test result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultCreate {
    pub user_id: String,
    pub test_name: String,
    pub value: String,
    pub date: String,
}

impl TestResult {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            test_name: row.get("test_name")?,
            value: row.get("value")?,
            date: row.get("date")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Record a new test result
    pub fn create(conn: &Connection, data: &TestResultCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO test_results (user_id, test_name, value, date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![data.user_id, data.test_name, data.value, data.date],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a test result by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM test_results WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(tr) => Ok(Some(tr)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all results for a user, ordered by date then insertion order
    pub fn list_for_user(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM test_results WHERE user_id = ?1 ORDER BY date, id",
        )?;
        let results = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(results)
    }

    /// List results for one test of a user, ordered by date
    pub fn list_for_user_test(
        conn: &Connection,
        user_id: &str,
        test_name: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM test_results WHERE user_id = ?1 AND test_name = ?2 ORDER BY date, id",
        )?;
        let results = stmt
            .query_map(params![user_id, test_name], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(results)
    }

    /// Delete a test result
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM test_results WHERE id = ?1", [id])?;
        Ok(rows > 0)
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

    fn add(conn: &Connection, test: &str, value: &str, date: &str) -> TestResult {
        TestResult::create(
            conn,
            &TestResultCreate {
                user_id: "u1".into(),
                test_name: test.into(),
                value: value.into(),
                date: date.into(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_list_ordered_by_date() {
        let conn = test_conn();
        add(&conn, "Hemoglobin", "14.2", "2025-03-01");
        add(&conn, "Hemoglobin", "13.1", "2025-01-15");
        add(&conn, "Glucose", "95", "2025-02-10");

        let all = TestResult::list_for_user(&conn, "u1").unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].date, "2025-01-15");

        let hgb = TestResult::list_for_user_test(&conn, "u1", "Hemoglobin").unwrap();
        assert_eq!(hgb.len(), 2);
        assert_eq!(hgb[0].value, "13.1");
        assert_eq!(hgb[1].value, "14.2");
    }

    #[test]
    fn test_delete() {
        let conn = test_conn();
        let tr = add(&conn, "Glucose", "95", "2025-02-10");
        assert!(TestResult::delete(&conn, tr.id).unwrap());
        assert!(!TestResult::delete(&conn, tr.id).unwrap());
        assert!(TestResult::get_by_id(&conn, tr.id).unwrap().is_none());
    }

    #[test]
    fn test_results_are_scoped_per_user() {
        let conn = test_conn();
        add(&conn, "Glucose", "95", "2025-02-10");
        assert!(TestResult::list_for_user(&conn, "u2").unwrap().is_empty());
    }
}
