//! Per-user settings and salary expectations

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::{Error, Result};
use crate::models::{SalaryExpectation, Settings};

impl Database {
    /// Read a user's settings row
    ///
    /// Returns None when the user never saved settings. Callers treat a
    /// missing row as notifications disabled.
    pub fn get_settings(&self, user_id: i64) -> Result<Option<Settings>> {
        let conn = self.conn()?;

        let settings = conn
            .query_row(
                "SELECT user_id, dark_mode, currency, language, notifications_enabled \
                 FROM settings WHERE user_id = ?",
                params![user_id],
                |row| {
                    Ok(Settings {
                        user_id: row.get(0)?,
                        dark_mode: row.get(1)?,
                        currency: row.get(2)?,
                        language: row.get(3)?,
                        notifications_enabled: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(settings)
    }

    /// Insert or replace a user's settings row
    pub fn upsert_settings(&self, settings: &Settings) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO settings (user_id, dark_mode, currency, language, notifications_enabled)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                dark_mode = excluded.dark_mode,
                currency = excluded.currency,
                language = excluded.language,
                notifications_enabled = excluded.notifications_enabled
            "#,
            params![
                settings.user_id,
                settings.dark_mode,
                settings.currency,
                settings.language,
                settings.notifications_enabled,
            ],
        )?;

        Ok(())
    }

    /// Read a user's salary expectation, if one was ever set
    pub fn get_salary_expectation(&self, user_id: i64) -> Result<Option<SalaryExpectation>> {
        let conn = self.conn()?;

        let expectation = conn
            .query_row(
                "SELECT user_id, expected_amount, expected_day \
                 FROM salary_expectations WHERE user_id = ?",
                params![user_id],
                |row| {
                    Ok(SalaryExpectation {
                        user_id: row.get(0)?,
                        expected_amount: row.get(1)?,
                        expected_day: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(expectation)
    }

    /// Insert or replace a user's salary expectation
    pub fn set_salary_expectation(
        &self,
        user_id: i64,
        expected_amount: f64,
        expected_day: u32,
    ) -> Result<()> {
        if !(1..=31).contains(&expected_day) {
            return Err(Error::InvalidData(format!(
                "expected_day must be between 1 and 31, got {}",
                expected_day
            )));
        }

        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO salary_expectations (user_id, expected_amount, expected_day)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                expected_amount = excluded.expected_amount,
                expected_day = excluded.expected_day
            "#,
            params![user_id, expected_amount, expected_day],
        )?;

        Ok(())
    }
}
