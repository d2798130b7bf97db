//! User, account, category, and budget commands

use anyhow::{anyhow, Context, Result};
use minder_core::db::Database;
use minder_core::models::AccountType;

pub fn cmd_user_add(db: &Database, username: &str, email: &str) -> Result<()> {
    let user_id = db
        .insert_user(username, email)
        .context("Failed to add user")?;
    println!("✅ Added user '{}' (id {})", username, user_id);
    Ok(())
}

pub fn cmd_user_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;
    if users.is_empty() {
        println!("No users yet. Add one: minder user add <username> <email>");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    for user in users {
        println!("   [{}] {} <{}>", user.id, user.username, user.email);
    }
    println!();
    Ok(())
}

pub fn cmd_account_add(
    db: &Database,
    user_id: i64,
    bank: &str,
    account_type: Option<&str>,
    currency: &str,
) -> Result<()> {
    let account_type = account_type
        .map(|s| s.parse::<AccountType>().map_err(|e| anyhow!(e)))
        .transpose()?;

    let account_id = db
        .add_account(user_id, bank, account_type, currency)
        .context("Failed to add account")?;
    println!("✅ Added account '{}' (id {})", bank, account_id);
    Ok(())
}

pub fn cmd_account_list(db: &Database, user_id: i64) -> Result<()> {
    let accounts = db.list_accounts(user_id)?;
    if accounts.is_empty() {
        println!("No accounts yet for user {}.", user_id);
        return Ok(());
    }

    println!();
    println!("🏦 Accounts");
    for account in accounts {
        let kind = account
            .account_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   [{}] {} ({}, {})",
            account.id, account.bank_name, kind, account.currency
        );
    }
    println!();
    Ok(())
}

pub fn cmd_category_add(
    db: &Database,
    user_id: i64,
    name: &str,
    color: Option<&str>,
) -> Result<()> {
    let category_id = db
        .add_category(user_id, name, color)
        .context("Failed to add category")?;
    println!("✅ Added category '{}' (id {})", name, category_id);
    Ok(())
}

pub fn cmd_category_list(db: &Database, user_id: i64) -> Result<()> {
    let categories = db.list_categories(user_id)?;
    if categories.is_empty() {
        println!("No categories yet for user {}.", user_id);
        return Ok(());
    }

    println!();
    println!("🗂️  Categories");
    for category in categories {
        if category.budget_amount > 0.0 {
            println!(
                "   [{}] {} (budget {:.2})",
                category.id, category.name, category.budget_amount
            );
        } else {
            println!("   [{}] {}", category.id, category.name);
        }
    }
    println!();
    Ok(())
}

/// Resolve a category name to its id, with a helpful error
pub fn resolve_category(db: &Database, user_id: i64, name: &str) -> Result<i64> {
    db.get_category_by_name(user_id, name)?
        .map(|c| c.id)
        .ok_or_else(|| anyhow!("No category named '{}' for user {}", name, user_id))
}

pub fn cmd_budget_set(db: &Database, user_id: i64, category: &str, amount: f64) -> Result<()> {
    if amount < 0.0 {
        return Err(anyhow!("Budget amount cannot be negative"));
    }

    let category_id = resolve_category(db, user_id, category)?;
    db.set_budget(user_id, category_id, amount)
        .context("Failed to set budget")?;

    if amount == 0.0 {
        println!("✅ Cleared budget on '{}'", category);
    } else {
        println!("✅ Set budget on '{}' to {:.2}", category, amount);
    }
    Ok(())
}

pub fn cmd_budget_list(db: &Database, user_id: i64) -> Result<()> {
    let usage = db.budget_usage(user_id)?;
    if usage.is_empty() {
        println!("No budgets set. Use: minder budget set --user {} <category> <amount>", user_id);
        return Ok(());
    }

    println!();
    println!("💰 Budgets");
    for row in usage {
        let percent = row.used / row.limit * 100.0;
        let marker = if row.used > row.limit {
            "❌"
        } else if percent > 80.0 {
            "⚠️ "
        } else {
            "  "
        };
        println!(
            "   {} {}: {:.2} / {:.2} ({:.0}%)",
            marker, row.category_name, row.used, row.limit, percent
        );
    }
    println!();
    Ok(())
}
