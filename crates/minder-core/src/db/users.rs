//! User operations

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

impl Database {
    /// Insert a user (signup anchor; the engine itself never mutates users)
    pub fn insert_user(&self, username: &str, email: &str) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO users (username, email) VALUES (?, ?)",
            params![username, email],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Look up a user by id
    pub fn get_user(&self, user_id: i64) -> Result<User> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT user_id, username, email, created_at FROM users WHERE user_id = ?",
            params![user_id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                Error::NotFound(format!("User {} not found", user_id))
            }
            other => Error::Database(other),
        })
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare("SELECT user_id, username, email, created_at FROM users ORDER BY user_id")?;
        let rows = stmt.query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                created_at: parse_datetime(&row.get::<_, String>(3)?),
            })
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
