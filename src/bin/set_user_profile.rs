//! Utility to set a user profile in the database
//!
//! Usage: set_user_profile <user_id> <name> [age]

use std::path::PathBuf;

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
    if args.len() < 3 {
        eprintln!("Usage: {} <user_id> <name> [age]", args[0]);
        std::process::exit(1);
    }
    let user_id = &args[1];
    let name = &args[2];
    let age: Option<i64> = match args.get(3) {
        Some(raw) => Some(raw.parse()?),
        None => None,
    };

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = labwatch::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        labwatch::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    database.with_conn(|conn| {
        let profile = labwatch::models::UserProfile::set(conn, user_id, name, age)?;
        println!("User profile set:");
        println!("  User ID: {}", profile.user_id);
        println!("  Name: {}", profile.name);
        match profile.age {
            Some(age) => println!("  Age: {}", age),
            None => println!("  Age: N/A"),
        }
        println!("  Updated: {}", profile.updated_at);
        Ok(())
    })?;

    Ok(())
}
