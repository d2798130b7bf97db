//! Domain models for Minder

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered user (identity anchor; never mutated by the engine)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A bank account owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub bank_name: String,
    pub account_type: Option<AccountType>,
    /// Stored currency for this account's transactions
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Credit => "credit",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Unknown account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending category with an optional monthly budget
///
/// `budget_amount` of 0 means no budget is set; spend against the budget is
/// always derived from transactions, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub budget_amount: f64,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded transaction (append-only; amounts are always positive,
/// direction lives in `transaction_type`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub created_at: DateTime<Utc>,
}

/// A transaction to be inserted
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub is_recurring: bool,
}

/// A recurring monthly obligation tied to a category
///
/// `due_day` is a plain day-of-month (1-31) compared as an integer against
/// today's day; it is never resolved to a real calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commitment {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    /// Category name joined in by the accessor
    pub category_name: String,
    pub amount: f64,
    pub due_day: u32,
    pub is_paid: bool,
    pub last_paid_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A persisted notification (the sole output of an insight cycle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Per-user settings row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub user_id: i64,
    pub dark_mode: bool,
    pub currency: String,
    pub language: String,
    pub notifications_enabled: bool,
}

impl Settings {
    /// Defaults applied when a user first saves settings
    pub fn defaults(user_id: i64) -> Self {
        Self {
            user_id,
            dark_mode: false,
            currency: "USD".to_string(),
            language: "en".to_string(),
            notifications_enabled: true,
        }
    }
}

/// Expected salary arrival for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryExpectation {
    pub user_id: i64,
    pub expected_amount: f64,
    pub expected_day: u32,
}

/// Budget usage for one category (accessor result)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetUsage {
    pub category_id: i64,
    pub category_name: String,
    /// The configured budget amount (always > 0 for rows returned)
    pub limit: f64,
    /// Sum of expense transactions in the category (0 with no transactions)
    pub used: f64,
}

/// Recurring-transaction concentration for one category (accessor result)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringUsage {
    pub category_id: i64,
    pub category_name: String,
    pub count: i64,
}

/// Income and expense totals for a user (accessor result)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CashflowTotals {
    pub income: f64,
    pub expense: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_type_round_trip() {
        assert_eq!(TransactionType::Expense.as_str(), "expense");
        assert_eq!(
            TransactionType::from_str("Income").unwrap(),
            TransactionType::Income
        );
        assert!(TransactionType::from_str("transfer").is_err());
    }

    #[test]
    fn test_account_type_parsing() {
        assert_eq!(
            AccountType::from_str("CHECKING").unwrap(),
            AccountType::Checking
        );
        assert_eq!(AccountType::Savings.to_string(), "savings");
    }

    #[test]
    fn test_settings_defaults() {
        let s = Settings::defaults(7);
        assert_eq!(s.user_id, 7);
        assert_eq!(s.currency, "USD");
        assert!(s.notifications_enabled);
        assert!(!s.dark_mode);
    }
}
