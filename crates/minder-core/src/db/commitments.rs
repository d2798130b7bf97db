//! Commitment due/paid lifecycle operations

use rusqlite::params;
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Commitment;

impl Database {
    /// Add a monthly commitment tied to a category
    pub fn add_commitment(
        &self,
        user_id: i64,
        category_id: i64,
        amount: f64,
        due_day: u32,
    ) -> Result<i64> {
        if !(1..=31).contains(&due_day) {
            return Err(Error::InvalidData(format!(
                "due_day must be between 1 and 31, got {}",
                due_day
            )));
        }

        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO category_commitments (user_id, category_id, amount, due_day) \
             VALUES (?, ?, ?, ?)",
            params![user_id, category_id, amount, due_day],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's commitments joined with their category names
    pub fn commitments(&self, user_id: i64) -> Result<Vec<Commitment>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT cc.commitment_id, cc.user_id, cc.category_id, c.category_name,
                   cc.amount, cc.due_day, cc.is_paid, cc.last_paid_date, cc.created_at
            FROM category_commitments cc
            JOIN categories c ON cc.category_id = c.category_id
            WHERE cc.user_id = ?
            ORDER BY cc.due_day, cc.commitment_id
            "#,
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            let last_paid: Option<String> = row.get(7)?;
            Ok(Commitment {
                id: row.get(0)?,
                user_id: row.get(1)?,
                category_id: row.get(2)?,
                category_name: row.get(3)?,
                amount: row.get(4)?,
                due_day: row.get(5)?,
                is_paid: row.get(6)?,
                last_paid_date: last_paid.map(|s| parse_datetime(&s)),
                created_at: parse_datetime(&row.get::<_, String>(8)?),
            })
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Mark a commitment paid, stamping `last_paid_date`
    pub fn mark_commitment_paid(&self, commitment_id: i64) -> Result<()> {
        let conn = self.conn()?;

        let updated = conn.execute(
            "UPDATE category_commitments \
             SET is_paid = 1, last_paid_date = CURRENT_TIMESTAMP \
             WHERE commitment_id = ?",
            params![commitment_id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!(
                "Commitment {} not found",
                commitment_id
            )));
        }

        Ok(())
    }

    /// Clear the paid flag on all of a user's commitments (monthly reset)
    ///
    /// Idempotent: rows already unpaid are unaffected, so running this twice
    /// on the 1st is harmless.
    pub fn reset_commitments(&self, user_id: i64) -> Result<usize> {
        let conn = self.conn()?;

        let reset = conn.execute(
            "UPDATE category_commitments SET is_paid = 0 WHERE user_id = ?",
            params![user_id],
        )?;

        if reset > 0 {
            info!(user_id, reset, "Monthly commitment reset");
        }

        Ok(reset)
    }
}
