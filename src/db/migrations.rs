//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USER PROFILES
        -- One row per tracked user, keyed by external ID
        -- ============================================
        CREATE TABLE user_profiles (
            user_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- TEST RESULTS
        -- Raw observations as imported. Value and date are
        -- kept as text; parsing happens at analysis time so a
        -- malformed row never blocks the rest of a batch.
        -- ============================================
        CREATE TABLE test_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            test_name TEXT NOT NULL,
            value TEXT NOT NULL,                 -- numeric text, e.g. "13.5"
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_test_results_user ON test_results(user_id);
        CREATE INDEX idx_test_results_user_test ON test_results(user_id, test_name);
        CREATE INDEX idx_test_results_date ON test_results(date);

        -- ============================================
        -- REFERENCE RANGES
        -- Clinically normal [min, max] interval per test,
        -- plus narrative guidance text
        -- ============================================
        CREATE TABLE reference_ranges (
            test_name TEXT PRIMARY KEY,
            min_value REAL,
            max_value REAL,

            -- Narrative guidance, carried verbatim into reports
            health_information TEXT,
            low_values_indicate TEXT,
            high_values_indicate TEXT,
            treatment_guide TEXT,
            low_specialization TEXT,
            high_specialization TEXT,
            care_guide TEXT,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),

            CHECK (min_value IS NULL OR max_value IS NULL OR min_value <= max_value)
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
