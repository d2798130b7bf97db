//! Category and budget operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{BudgetUsage, Category};

impl Database {
    /// Add a category for a user
    pub fn add_category(&self, user_id: i64, name: &str, color: Option<&str>) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO categories (user_id, category_name, color) VALUES (?, ?, ?)",
            params![user_id, name, color],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's categories
    pub fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT category_id, user_id, category_name, budget_amount, color, created_at \
             FROM categories WHERE user_id = ? ORDER BY category_id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Category {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                budget_amount: row.get(3)?,
                color: row.get(4)?,
                created_at: parse_datetime(&row.get::<_, String>(5)?),
            })
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Resolve a category by name (case-sensitive, scoped to the user)
    pub fn get_category_by_name(&self, user_id: i64, name: &str) -> Result<Option<Category>> {
        let conn = self.conn()?;

        let category = conn
            .query_row(
                "SELECT category_id, user_id, category_name, budget_amount, color, created_at \
                 FROM categories WHERE user_id = ? AND category_name = ?",
                params![user_id, name],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        budget_amount: row.get(3)?,
                        color: row.get(4)?,
                        created_at: parse_datetime(&row.get::<_, String>(5)?),
                    })
                },
            )
            .optional()?;

        Ok(category)
    }

    /// Set (or clear, with 0) the budget amount for a category
    pub fn set_budget(&self, user_id: i64, category_id: i64, amount: f64) -> Result<()> {
        let conn = self.conn()?;

        let updated = conn.execute(
            "UPDATE categories SET budget_amount = ? WHERE user_id = ? AND category_id = ?",
            params![amount, user_id, category_id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!(
                "Category {} not found for user {}",
                category_id, user_id
            )));
        }

        Ok(())
    }

    /// Budget usage per category, for every category with a budget set
    ///
    /// `used` is the sum of expense-type transaction amounts in the category,
    /// 0 when the category has no transactions. Categories with
    /// `budget_amount = 0` are excluded here and never reach the evaluator.
    pub fn budget_usage(&self, user_id: i64) -> Result<Vec<BudgetUsage>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT c.category_id, c.category_name, c.budget_amount,
                   COALESCE((SELECT SUM(t.amount) FROM transactions t
                             WHERE t.user_id = ?1
                               AND t.category_id = c.category_id
                               AND t.transaction_type = 'expense'), 0) AS used
            FROM categories c
            WHERE c.user_id = ?1 AND c.budget_amount > 0
            ORDER BY c.category_id
            "#,
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(BudgetUsage {
                category_id: row.get(0)?,
                category_name: row.get(1)?,
                limit: row.get(2)?,
                used: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTransaction, TransactionType};
    use chrono::NaiveDate;

    fn seed_user(db: &Database) -> i64 {
        db.insert_user("maya", "maya@example.com").unwrap()
    }

    #[test]
    fn test_set_budget() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);
        let cat_id = db.add_category(user_id, "Food", None).unwrap();

        db.set_budget(user_id, cat_id, 250.0).unwrap();

        let cats = db.list_categories(user_id).unwrap();
        assert_eq!(cats[0].budget_amount, 250.0);
    }

    #[test]
    fn test_set_budget_missing_category() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);
        let err = db.set_budget(user_id, 42, 100.0).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_budget_usage_excludes_unbudgeted() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);
        let food = db.add_category(user_id, "Food", None).unwrap();
        db.add_category(user_id, "Misc", None).unwrap();
        db.set_budget(user_id, food, 100.0).unwrap();

        let usage = db.budget_usage(user_id).unwrap();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].category_name, "Food");
        assert_eq!(usage[0].used, 0.0);
    }

    #[test]
    fn test_budget_usage_sums_expenses_only() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);
        let account_id = db.add_account(user_id, "Test", None, "USD").unwrap();
        let food = db.add_category(user_id, "Food", None).unwrap();
        db.set_budget(user_id, food, 100.0).unwrap();

        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        for (amount, kind) in [
            (40.0, TransactionType::Expense),
            (35.0, TransactionType::Expense),
            (500.0, TransactionType::Income),
        ] {
            db.insert_transaction(
                user_id,
                &NewTransaction {
                    account_id,
                    category_id: Some(food),
                    amount,
                    transaction_type: kind,
                    description: None,
                    date,
                    is_recurring: false,
                },
            )
            .unwrap();
        }

        let usage = db.budget_usage(user_id).unwrap();
        assert_eq!(usage[0].used, 75.0);
        assert_eq!(usage[0].limit, 100.0);
    }
}
