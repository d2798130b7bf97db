//! Commitment add/list/pay commands

use anyhow::{Context, Result};
use minder_core::db::Database;

use super::resolve_category;

pub fn cmd_commit_add(
    db: &Database,
    user_id: i64,
    category: &str,
    amount: f64,
    due_day: u32,
) -> Result<()> {
    let category_id = resolve_category(db, user_id, category)?;
    let commitment_id = db
        .add_commitment(user_id, category_id, amount, due_day)
        .context("Failed to add commitment")?;

    println!(
        "✅ Added commitment '{}' of {:.2}, due on day {} (id {})",
        category, amount, due_day, commitment_id
    );
    Ok(())
}

pub fn cmd_commit_list(db: &Database, user_id: i64) -> Result<()> {
    let commitments = db.commitments(user_id)?;
    if commitments.is_empty() {
        println!("No commitments yet for user {}.", user_id);
        return Ok(());
    }

    println!();
    println!("📋 Commitments");
    for c in commitments {
        let status = if c.is_paid { "✅ paid" } else { "⏳ unpaid" };
        println!(
            "   [{}] {} {:.2} due day {} ({})",
            c.id, c.category_name, c.amount, c.due_day, status
        );
    }
    println!();
    Ok(())
}

pub fn cmd_commit_pay(db: &Database, commitment_id: i64) -> Result<()> {
    db.mark_commitment_paid(commitment_id)
        .context("Failed to mark commitment paid")?;
    println!("✅ Commitment {} marked paid", commitment_id);
    Ok(())
}
