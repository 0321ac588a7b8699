//! Utility to bulk-load reference ranges from a JSON file
//!
//! Usage: seed_reference_ranges <ranges.json>
//!
//! The file holds an array of reference range objects matching the
//! set_reference_range tool parameters:
//!
//! [
//!   {
//!     "test_name": "Hemoglobin",
//!     "min_value": 13.5,
//!     "max_value": 17.5,
//!     "care_guide": "Maintain an iron-rich diet."
//!   }
//! ]

use std::path::PathBuf;

use labwatch::models::{ReferenceRange, ReferenceRangeUpsert};

fn get_database_path() -> PathBuf {
    std::env::var("LABWATCH_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("labwatch.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <ranges.json>", args[0]);
        std::process::exit(1);
    }

    let file = std::fs::File::open(&args[1])?;
    let ranges: Vec<ReferenceRangeUpsert> = serde_json::from_reader(file)?;
    println!("Loaded {} reference ranges from {}", ranges.len(), args[1]);

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = labwatch::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        labwatch::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let mut seeded = 0usize;
    let mut failed = 0usize;
    database.with_conn(|conn| {
        for data in &ranges {
            match ReferenceRange::set(conn, data) {
                Ok(range) => {
                    println!("  {} [{:?}, {:?}]", range.test_name, range.min_value, range.max_value);
                    seeded += 1;
                }
                Err(e) => {
                    eprintln!("  Skipping '{}': {}", data.test_name, e);
                    failed += 1;
                }
            }
        }
        Ok(())
    })?;

    println!("Seeded {} ranges ({} skipped)", seeded, failed);
    Ok(())
}
