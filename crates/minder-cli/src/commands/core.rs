//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` / `default_db_path` - Shared database helpers
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Database status
//! - `cmd_convert` - Display-only currency conversion

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use minder_core::db::Database;
use minder_core::CurrencyConverter;

/// Default database location under the platform data directory
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("minder").join("minder.db"))
        .unwrap_or_else(|| PathBuf::from("minder.db"))
}

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path.to_str().context("Database path is not valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }
    }

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a user: minder user add <username> <email>");
    println!("  2. Add an account: minder account add --user 1 <bank>");
    println!("  3. Run insights: minder insights --user 1");

    Ok(())
}

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use minder_core::db::DB_KEY_ENV;
    use std::fs;

    println!();
    println!("📊 Minder Status");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                let conn = db.conn()?;
                let count = |table: &str| -> Result<i64> {
                    Ok(conn.query_row(
                        &format!("SELECT COUNT(*) FROM {}", table),
                        [],
                        |row| row.get(0),
                    )?)
                };
                println!();
                println!("   Users: {}", count("users")?);
                println!("   Accounts: {}", count("accounts")?);
                println!("   Transactions: {}", count("transactions")?);
                println!("   Commitments: {}", count("category_commitments")?);
                println!("   Notifications: {}", count("notifications")?);
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    Ok(())
}

pub async fn cmd_convert(amount: f64, from: &str, to: &str) -> Result<()> {
    let converter = CurrencyConverter::new();

    match converter.convert(amount, from, to).await {
        Some(converted) => println!("💱 {:.2} {} ≈ {:.2} {}", amount, from, converted, to),
        None => println!("💱 Conversion unavailable right now, try again later"),
    }

    Ok(())
}
