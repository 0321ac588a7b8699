//! Reference range model
//!
//! The clinically normal [min, max] interval for a test, plus the narrative
//! guidance text carried verbatim into classifications and reports.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Reference range record, keyed by test name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub test_name: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub health_information: Option<String>,
    pub low_values_indicate: Option<String>,
    pub high_values_indicate: Option<String>,
    pub treatment_guide: Option<String>,
    pub low_specialization: Option<String>,
    pub high_specialization: Option<String>,
    pub care_guide: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for setting a reference range (upsert)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceRangeUpsert {
    pub test_name: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub health_information: Option<String>,
    pub low_values_indicate: Option<String>,
    pub high_values_indicate: Option<String>,
    pub treatment_guide: Option<String>,
    pub low_specialization: Option<String>,
    pub high_specialization: Option<String>,
    pub care_guide: Option<String>,
}

impl ReferenceRange {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            test_name: row.get("test_name")?,
            min_value: row.get("min_value")?,
            max_value: row.get("max_value")?,
            health_information: row.get("health_information")?,
            low_values_indicate: row.get("low_values_indicate")?,
            high_values_indicate: row.get("high_values_indicate")?,
            treatment_guide: row.get("treatment_guide")?,
            low_specialization: row.get("low_specialization")?,
            high_specialization: row.get("high_specialization")?,
            care_guide: row.get("care_guide")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Both bounds, when the record carries them. Consumers skip ranges
    /// missing either bound.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match (self.min_value, self.max_value) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }

    /// Set or update a reference range (upsert)
    pub fn set(conn: &Connection, data: &ReferenceRangeUpsert) -> DbResult<Self> {
        if let (Some(min), Some(max)) = (data.min_value, data.max_value) {
            if min > max {
                return Err(DbError::Invalid(format!(
                    "min_value {} exceeds max_value {} for '{}'",
                    min, max, data.test_name
                )));
            }
        }

        conn.execute(
            r#"
            INSERT INTO reference_ranges (
                test_name, min_value, max_value,
                health_information, low_values_indicate, high_values_indicate,
                treatment_guide, low_specialization, high_specialization, care_guide
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(test_name) DO UPDATE SET
                min_value = excluded.min_value,
                max_value = excluded.max_value,
                health_information = excluded.health_information,
                low_values_indicate = excluded.low_values_indicate,
                high_values_indicate = excluded.high_values_indicate,
                treatment_guide = excluded.treatment_guide,
                low_specialization = excluded.low_specialization,
                high_specialization = excluded.high_specialization,
                care_guide = excluded.care_guide,
                updated_at = datetime('now')
            "#,
            params![
                data.test_name,
                data.min_value,
                data.max_value,
                data.health_information,
                data.low_values_indicate,
                data.high_values_indicate,
                data.treatment_guide,
                data.low_specialization,
                data.high_specialization,
                data.care_guide,
            ],
        )?;

        Self::get_by_name(conn, &data.test_name)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a reference range by test name
    pub fn get_by_name(conn: &Connection, test_name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM reference_ranges WHERE test_name = ?1")?;

        let result = stmt.query_row([test_name], Self::from_row);
        match result {
            Ok(range) => Ok(Some(range)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all reference ranges, ordered by test name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM reference_ranges ORDER BY test_name")?;
        let ranges = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ranges)
    }

    /// Delete a reference range
    pub fn delete(conn: &Connection, test_name: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM reference_ranges WHERE test_name = ?1", [test_name])?;
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

    #[test]
    fn test_set_get_and_bounds() {
        let conn = test_conn();
        let range = ReferenceRange::set(
            &conn,
            &ReferenceRangeUpsert {
                test_name: "Hemoglobin".into(),
                min_value: Some(13.5),
                max_value: Some(17.5),
                care_guide: Some("Maintain an iron-rich diet.".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(range.bounds(), Some((13.5, 17.5)));

        let fetched = ReferenceRange::get_by_name(&conn, "Hemoglobin").unwrap().unwrap();
        assert_eq!(fetched.care_guide.as_deref(), Some("Maintain an iron-rich diet."));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let conn = test_conn();
        let result = ReferenceRange::set(
            &conn,
            &ReferenceRangeUpsert {
                test_name: "Hemoglobin".into(),
                min_value: Some(17.5),
                max_value: Some(13.5),
                ..Default::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_bound_gives_no_bounds() {
        let conn = test_conn();
        let range = ReferenceRange::set(
            &conn,
            &ReferenceRangeUpsert {
                test_name: "TSH".into(),
                min_value: Some(0.4),
                max_value: None,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(range.bounds(), None);
    }

    #[test]
    fn test_upsert_overwrites() {
        let conn = test_conn();
        for max in [17.5, 18.0] {
            ReferenceRange::set(
                &conn,
                &ReferenceRangeUpsert {
                    test_name: "Hemoglobin".into(),
                    min_value: Some(13.5),
                    max_value: Some(max),
                    ..Default::default()
                },
            )
            .unwrap();
        }
        let range = ReferenceRange::get_by_name(&conn, "Hemoglobin").unwrap().unwrap();
        assert_eq!(range.max_value, Some(18.0));
        assert_eq!(ReferenceRange::list(&conn).unwrap().len(), 1);
    }
}
