//! Bank account operations

use rusqlite::params;
use std::str::FromStr;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Account, AccountType};

impl Database {
    /// Add a bank account for a user
    pub fn add_account(
        &self,
        user_id: i64,
        bank_name: &str,
        account_type: Option<AccountType>,
        currency: &str,
    ) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO accounts (user_id, bank_name, account_type, currency) VALUES (?, ?, ?, ?)",
            params![
                user_id,
                bank_name,
                account_type.map(|t| t.as_str()),
                currency
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's accounts
    pub fn list_accounts(&self, user_id: i64) -> Result<Vec<Account>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT account_id, user_id, bank_name, account_type, currency, created_at \
             FROM accounts WHERE user_id = ? ORDER BY account_id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            let account_type: Option<String> = row.get(3)?;
            Ok(Account {
                id: row.get(0)?,
                user_id: row.get(1)?,
                bank_name: row.get(2)?,
                account_type: account_type.and_then(|t| AccountType::from_str(&t).ok()),
                currency: row.get(4)?,
                created_at: parse_datetime(&row.get::<_, String>(5)?),
            })
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_list_accounts() {
        let db = Database::in_memory().unwrap();
        let user_id = db.insert_user("maya", "maya@example.com").unwrap();

        db.add_account(user_id, "First National", Some(AccountType::Checking), "USD")
            .unwrap();
        db.add_account(user_id, "Savings Co", Some(AccountType::Savings), "EUR")
            .unwrap();

        let accounts = db.list_accounts(user_id).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].bank_name, "First National");
        assert_eq!(accounts[0].account_type, Some(AccountType::Checking));
        assert_eq!(accounts[1].currency, "EUR");
    }

    #[test]
    fn test_accounts_scoped_to_user() {
        let db = Database::in_memory().unwrap();
        let a = db.insert_user("a", "a@example.com").unwrap();
        let b = db.insert_user("b", "b@example.com").unwrap();
        db.add_account(a, "Bank A", None, "USD").unwrap();

        assert_eq!(db.list_accounts(a).unwrap().len(), 1);
        assert!(db.list_accounts(b).unwrap().is_empty());
    }
}
