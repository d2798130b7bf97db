//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Minder - Personal finance insights and reminders
#[derive(Parser)]
#[command(name = "minder")]
#[command(about = "Personal finance insight and notification engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set MINDER_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status (encryption, size, row counts)
    Status,

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage bank accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Manage spending categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage category budgets
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Record and list transactions
    Tx {
        #[command(subcommand)]
        action: TxAction,
    },

    /// Pay an amount into a category (logs an expense and notifies)
    Transfer {
        /// User id
        #[arg(long)]
        user: i64,

        /// Account id the payment comes from
        #[arg(long)]
        account: i64,

        /// Category name to pay into
        #[arg(long)]
        category: String,

        /// Amount to pay
        amount: f64,

        /// Optional note stored on the transaction
        #[arg(long)]
        note: Option<String>,
    },

    /// Manage monthly commitments
    Commit {
        #[command(subcommand)]
        action: CommitAction,
    },

    /// Manage per-user settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Set the expected salary arrival
    Salary {
        #[command(subcommand)]
        action: SalaryAction,
    },

    /// Run the insight cycle and commitment check (dashboard-load equivalent)
    Insights {
        /// User id
        #[arg(long)]
        user: i64,
    },

    /// List notifications, or mark one read
    Notifications {
        /// User id
        #[arg(long)]
        user: i64,

        /// Show all notifications instead of the top 3
        #[arg(long)]
        all: bool,

        #[command(subcommand)]
        action: Option<NotificationsAction>,
    },

    /// Convert an amount between currencies (display only)
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Add a user
    Add { username: String, email: String },
    /// List users
    List,
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Add an account
    Add {
        #[arg(long)]
        user: i64,

        /// Bank name
        bank: String,

        /// Account type: checking, savings, credit
        #[arg(long = "type")]
        account_type: Option<String>,

        /// Stored currency
        #[arg(long, default_value = "USD")]
        currency: String,
    },
    /// List a user's accounts
    List {
        #[arg(long)]
        user: i64,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Add a category
    Add {
        #[arg(long)]
        user: i64,

        name: String,

        /// Display color (e.g. #ff8800)
        #[arg(long)]
        color: Option<String>,
    },
    /// List a user's categories
    List {
        #[arg(long)]
        user: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Set (or clear, with 0) a category's monthly budget
    Set {
        #[arg(long)]
        user: i64,

        /// Category name
        category: String,

        /// Budget amount (0 clears the budget)
        amount: f64,
    },
    /// Show budget usage per category
    List {
        #[arg(long)]
        user: i64,
    },
}

#[derive(Subcommand)]
pub enum TxAction {
    /// Record a transaction
    Add {
        #[arg(long)]
        user: i64,

        #[arg(long)]
        account: i64,

        /// Category name (optional)
        #[arg(long)]
        category: Option<String>,

        /// Amount (always positive; direction comes from --type)
        amount: f64,

        /// Transaction type: expense or income
        #[arg(long = "type", default_value = "expense")]
        kind: String,

        #[arg(long)]
        description: Option<String>,

        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Flag as a recurring transaction
        #[arg(long)]
        recurring: bool,
    },
    /// List recent transactions
    List {
        #[arg(long)]
        user: i64,

        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum CommitAction {
    /// Add a monthly commitment
    Add {
        #[arg(long)]
        user: i64,

        /// Category name
        category: String,

        /// Amount due each month
        amount: f64,

        /// Day of month the commitment is due (1-31)
        #[arg(long)]
        due_day: u32,
    },
    /// List a user's commitments
    List {
        #[arg(long)]
        user: i64,
    },
    /// Mark a commitment paid
    Pay { id: i64 },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Update settings (unspecified fields keep their current value)
    Set {
        #[arg(long)]
        user: i64,

        /// Enable or disable commitment notifications: on, off
        #[arg(long)]
        notifications: Option<String>,

        #[arg(long)]
        currency: Option<String>,

        #[arg(long)]
        language: Option<String>,

        /// Dark mode: on, off
        #[arg(long)]
        dark_mode: Option<String>,
    },
    /// Show settings
    Show {
        #[arg(long)]
        user: i64,
    },
}

#[derive(Subcommand)]
pub enum SalaryAction {
    /// Set the expected salary amount and arrival day
    Set {
        #[arg(long)]
        user: i64,

        amount: f64,

        /// Day of month the salary arrives (1-31)
        #[arg(long)]
        day: u32,
    },
}

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// Mark a notification read
    Read { id: i64 },
}
