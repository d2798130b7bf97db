//! Settings and salary expectation commands

use anyhow::{anyhow, Context, Result};
use minder_core::db::Database;
use minder_core::models::Settings;

/// Parse an on/off flag value
fn parse_toggle(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(anyhow!("Expected 'on' or 'off', got '{}'", other)),
    }
}

pub fn cmd_settings_set(
    db: &Database,
    user_id: i64,
    notifications: Option<&str>,
    currency: Option<&str>,
    language: Option<&str>,
    dark_mode: Option<&str>,
) -> Result<()> {
    let mut settings = db
        .get_settings(user_id)?
        .unwrap_or_else(|| Settings::defaults(user_id));

    if let Some(value) = notifications {
        settings.notifications_enabled = parse_toggle(value)?;
    }
    if let Some(value) = currency {
        settings.currency = value.to_uppercase();
    }
    if let Some(value) = language {
        settings.language = value.to_string();
    }
    if let Some(value) = dark_mode {
        settings.dark_mode = parse_toggle(value)?;
    }

    db.upsert_settings(&settings)
        .context("Failed to save settings")?;
    println!("✅ Settings saved for user {}", user_id);
    Ok(())
}

pub fn cmd_settings_show(db: &Database, user_id: i64) -> Result<()> {
    match db.get_settings(user_id)? {
        Some(settings) => {
            println!();
            println!("⚙️  Settings for user {}", user_id);
            println!(
                "   Notifications: {}",
                if settings.notifications_enabled { "on" } else { "off" }
            );
            println!("   Currency: {}", settings.currency);
            println!("   Language: {}", settings.language);
            println!(
                "   Dark mode: {}",
                if settings.dark_mode { "on" } else { "off" }
            );
            println!();
        }
        None => {
            println!(
                "No settings saved for user {} (commitment notifications are off until saved).",
                user_id
            );
        }
    }
    Ok(())
}

pub fn cmd_salary_set(db: &Database, user_id: i64, amount: f64, day: u32) -> Result<()> {
    db.set_salary_expectation(user_id, amount, day)
        .context("Failed to save salary expectation")?;
    println!(
        "✅ Expecting salary of {:.2} around day {} each month",
        amount, day
    );
    Ok(())
}
