//! Transaction recording, listing, and category transfers

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use minder_core::db::Database;
use minder_core::models::{NewTransaction, TransactionType};

use super::{resolve_category, truncate};

#[allow(clippy::too_many_arguments)]
pub fn cmd_tx_add(
    db: &Database,
    user_id: i64,
    account_id: i64,
    category: Option<&str>,
    amount: f64,
    kind: &str,
    description: Option<&str>,
    date: Option<&str>,
    recurring: bool,
) -> Result<()> {
    if amount <= 0.0 {
        return Err(anyhow!(
            "Amount must be positive; direction comes from --type"
        ));
    }

    let kind: TransactionType = kind.parse().map_err(|e: String| anyhow!(e))?;
    let date = date
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("Invalid --date format (use YYYY-MM-DD)")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let category_id = category
        .map(|name| resolve_category(db, user_id, name))
        .transpose()?;

    let tx_id = db
        .insert_transaction(
            user_id,
            &NewTransaction {
                account_id,
                category_id,
                amount,
                transaction_type: kind,
                description: description.map(|s| s.to_string()),
                date,
                is_recurring: recurring,
            },
        )
        .context("Failed to record transaction")?;

    println!("✅ Recorded {} of {:.2} (id {})", kind, amount, tx_id);
    Ok(())
}

pub fn cmd_tx_list(db: &Database, user_id: i64, limit: usize) -> Result<()> {
    let transactions = db.list_transactions(user_id, limit)?;
    if transactions.is_empty() {
        println!("No transactions yet for user {}.", user_id);
        return Ok(());
    }

    println!();
    println!("🧾 Transactions");
    for tx in transactions {
        let sign = match tx.transaction_type {
            TransactionType::Expense => "-",
            TransactionType::Income => "+",
        };
        let recurring = if tx.is_recurring { " 🔁" } else { "" };
        println!(
            "   [{}] {} {}{:.2} {}{}",
            tx.id,
            tx.date,
            sign,
            tx.amount,
            truncate(tx.description.as_deref().unwrap_or("-"), 40),
            recurring
        );
    }
    println!();
    Ok(())
}

pub fn cmd_transfer(
    db: &Database,
    user_id: i64,
    account_id: i64,
    category: &str,
    amount: f64,
    note: Option<&str>,
) -> Result<()> {
    if amount <= 0.0 {
        return Err(anyhow!("Transfer amount must be positive"));
    }

    let category_id = resolve_category(db, user_id, category)?;
    let now = chrono::Local::now().naive_local();
    db.transfer_to_category(user_id, account_id, category_id, amount, note, now)
        .context("Failed to transfer")?;

    println!("✅ Paid {:.2} into '{}'", amount, category);
    Ok(())
}
