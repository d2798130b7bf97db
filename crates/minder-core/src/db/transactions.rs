//! Transaction inserts and cashflow aggregates

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use std::str::FromStr;

use super::{parse_datetime, Database, NotificationOutcome};
use crate::error::{Error, Result};
use crate::models::{CashflowTotals, NewTransaction, RecurringUsage, Transaction, TransactionType};

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let type_str: String = row.get(5)?;
    let date_str: String = row.get(7)?;
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        account_id: row.get(2)?,
        category_id: row.get(3)?,
        amount: row.get(4)?,
        transaction_type: TransactionType::from_str(&type_str)
            .unwrap_or(TransactionType::Expense),
        description: row.get(6)?,
        date: chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
        is_recurring: row.get(8)?,
        created_at: parse_datetime(&row.get::<_, String>(9)?),
    })
}

const TRANSACTION_COLUMNS: &str = "transaction_id, user_id, account_id, category_id, amount, \
                                   transaction_type, description, date, is_recurring, created_at";

impl Database {
    /// Insert a transaction (append-only; the engine only ever reads them back
    /// for aggregation)
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, account_id, category_id, amount, transaction_type, description, date, is_recurring)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.account_id,
                tx.category_id,
                tx.amount,
                tx.transaction_type.as_str(),
                tx.description,
                tx.date.to_string(),
                tx.is_recurring,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's most recent transactions
    pub fn list_transactions(&self, user_id: i64, limit: usize) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let sql = format!(
            "SELECT {} FROM transactions WHERE user_id = ? \
             ORDER BY date DESC, transaction_id DESC LIMIT ?",
            TRANSACTION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, limit], |row| row_to_transaction(row))?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// The category with the most recurring-flagged transactions
    ///
    /// Ties break toward the lowest category id so repeated runs always pick
    /// the same category.
    pub fn top_recurring_category(&self, user_id: i64) -> Result<Option<RecurringUsage>> {
        let conn = self.conn()?;

        let top = conn
            .query_row(
                r#"
                SELECT c.category_id, c.category_name, COUNT(*) AS freq
                FROM transactions t
                JOIN categories c ON t.category_id = c.category_id
                WHERE t.user_id = ? AND t.is_recurring = 1
                GROUP BY t.category_id
                ORDER BY freq DESC, c.category_id ASC
                LIMIT 1
                "#,
                params![user_id],
                |row| {
                    Ok(RecurringUsage {
                        category_id: row.get(0)?,
                        category_name: row.get(1)?,
                        count: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(top)
    }

    /// Income and expense totals across all of a user's transactions
    ///
    /// A type with no transactions contributes 0.
    pub fn income_expense_totals(&self, user_id: i64) -> Result<CashflowTotals> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT transaction_type, SUM(amount) FROM transactions \
             WHERE user_id = ? GROUP BY transaction_type",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut totals = CashflowTotals::default();
        for row in rows {
            let (kind, total) = row?;
            match kind.as_str() {
                "income" => totals.income = total,
                "expense" => totals.expense = total,
                _ => {}
            }
        }

        Ok(totals)
    }

    /// Pay an amount into a category: logs an expense transaction and posts a
    /// payment notification through the daily dedup guard
    pub fn transfer_to_category(
        &self,
        user_id: i64,
        account_id: i64,
        category_id: i64,
        amount: f64,
        note: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<NotificationOutcome> {
        let category_name: String = {
            let conn = self.conn()?;
            conn.query_row(
                "SELECT category_name FROM categories WHERE user_id = ? AND category_id = ?",
                params![user_id, category_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Category {} not found for user {}",
                    category_id, user_id
                ))
            })?
        };

        self.insert_transaction(
            user_id,
            &NewTransaction {
                account_id,
                category_id: Some(category_id),
                amount,
                transaction_type: TransactionType::Expense,
                description: Some(note.unwrap_or("Transfer to category").to_string()),
                date: now.date(),
                is_recurring: false,
            },
        )?;

        let content = format!("💸 You paid {:.2} into '{}'", amount, category_name);
        self.create_notification(user_id, &content, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn seed(db: &Database) -> (i64, i64, i64) {
        let user_id = db.insert_user("maya", "maya@example.com").unwrap();
        let account_id = db.add_account(user_id, "Test", None, "USD").unwrap();
        let category_id = db.add_category(user_id, "Bills", None).unwrap();
        (user_id, account_id, category_id)
    }

    fn tx(account_id: i64, category_id: Option<i64>, amount: f64, kind: TransactionType) -> NewTransaction {
        NewTransaction {
            account_id,
            category_id,
            amount,
            transaction_type: kind,
            description: None,
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            is_recurring: false,
        }
    }

    #[test]
    fn test_insert_and_list() {
        let db = Database::in_memory().unwrap();
        let (user_id, account_id, category_id) = seed(&db);

        db.insert_transaction(
            user_id,
            &tx(account_id, Some(category_id), 42.5, TransactionType::Expense),
        )
        .unwrap();

        let listed = db.list_transactions(user_id, 10).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, 42.5);
        assert_eq!(listed[0].transaction_type, TransactionType::Expense);
        assert_eq!(listed[0].date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
    }

    #[test]
    fn test_income_expense_totals() {
        let db = Database::in_memory().unwrap();
        let (user_id, account_id, category_id) = seed(&db);

        db.insert_transaction(
            user_id,
            &tx(account_id, Some(category_id), 100.0, TransactionType::Income),
        )
        .unwrap();
        db.insert_transaction(
            user_id,
            &tx(account_id, Some(category_id), 30.0, TransactionType::Expense),
        )
        .unwrap();
        db.insert_transaction(
            user_id,
            &tx(account_id, None, 20.0, TransactionType::Expense),
        )
        .unwrap();

        let totals = db.income_expense_totals(user_id).unwrap();
        assert_eq!(totals.income, 100.0);
        assert_eq!(totals.expense, 50.0);
    }

    #[test]
    fn test_totals_default_to_zero() {
        let db = Database::in_memory().unwrap();
        let (user_id, _, _) = seed(&db);

        let totals = db.income_expense_totals(user_id).unwrap();
        assert_eq!(totals.income, 0.0);
        assert_eq!(totals.expense, 0.0);
    }

    #[test]
    fn test_top_recurring_category_tie_break() {
        let db = Database::in_memory().unwrap();
        let (user_id, account_id, bills) = seed(&db);
        let rent = db.add_category(user_id, "Rent", None).unwrap();

        // One recurring transaction in each category: lowest id wins the tie
        for category_id in [rent, bills] {
            let mut t = tx(account_id, Some(category_id), 10.0, TransactionType::Expense);
            t.is_recurring = true;
            db.insert_transaction(user_id, &t).unwrap();
        }

        let top = db.top_recurring_category(user_id).unwrap().unwrap();
        assert_eq!(top.category_id, bills.min(rent));
        assert_eq!(top.count, 1);
    }

    #[test]
    fn test_top_recurring_category_empty() {
        let db = Database::in_memory().unwrap();
        let (user_id, account_id, category_id) = seed(&db);
        db.insert_transaction(
            user_id,
            &tx(account_id, Some(category_id), 10.0, TransactionType::Expense),
        )
        .unwrap();

        // No recurring-flagged rows at all
        assert!(db.top_recurring_category(user_id).unwrap().is_none());
    }

    #[test]
    fn test_transfer_logs_expense_and_notifies() {
        let db = Database::in_memory().unwrap();
        let (user_id, account_id, category_id) = seed(&db);
        let now = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let outcome = db
            .transfer_to_category(user_id, account_id, category_id, 75.0, None, now)
            .unwrap();
        assert!(outcome.is_created());

        let totals = db.income_expense_totals(user_id).unwrap();
        assert_eq!(totals.expense, 75.0);

        let notifications = db.recent_notifications(user_id, 5).unwrap();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].content.contains("Bills"));
    }
}
