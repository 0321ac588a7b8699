//! Database module
//!
//! Handles SQLite connection and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};

#[cfg(test)]
pub(crate) mod testutil {
    use std::path::PathBuf;

    use super::{migrations, Database};

    /// File-backed database in a private temp directory, removed on drop.
    /// Used where a pooled connection is needed (in-memory SQLite cannot be
    /// shared across a pool).
    pub struct TempDb {
        pub db: Database,
        dir: PathBuf,
    }

    impl TempDb {
        pub fn new(label: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "labwatch-{}-{}-{}",
                label,
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap()
                    .as_nanos()
            ));
            std::fs::create_dir_all(&dir).unwrap();
            let db = Database::new(dir.join("test.db")).unwrap();
            db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
            Self { db, dir }
        }

        /// Path for an extra file inside the temp directory
        pub fn path(&self, file: &str) -> PathBuf {
            self.dir.join(file)
        }
    }

    impl Drop for TempDb {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }
}
