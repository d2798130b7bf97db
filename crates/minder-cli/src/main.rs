//! Minder CLI - Personal finance insights and reminders
//!
//! Usage:
//!   minder init                       Initialize database
//!   minder tx add --user 1 ...        Record a transaction
//!   minder insights --user 1          Run the insight cycle
//!   minder notifications --user 1     Show recent notifications

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = cli.db.clone().unwrap_or_else(commands::default_db_path);

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&db_path, cli.no_encrypt),
        Commands::Convert { amount, from, to } => commands::cmd_convert(amount, &from, &to).await,
        Commands::User { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                UserAction::Add { username, email } => {
                    commands::cmd_user_add(&db, &username, &email)
                }
                UserAction::List => commands::cmd_user_list(&db),
            }
        }
        Commands::Account { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                AccountAction::Add {
                    user,
                    bank,
                    account_type,
                    currency,
                } => commands::cmd_account_add(&db, user, &bank, account_type.as_deref(), &currency),
                AccountAction::List { user } => commands::cmd_account_list(&db, user),
            }
        }
        Commands::Category { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                CategoryAction::Add { user, name, color } => {
                    commands::cmd_category_add(&db, user, &name, color.as_deref())
                }
                CategoryAction::List { user } => commands::cmd_category_list(&db, user),
            }
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                BudgetAction::Set {
                    user,
                    category,
                    amount,
                } => commands::cmd_budget_set(&db, user, &category, amount),
                BudgetAction::List { user } => commands::cmd_budget_list(&db, user),
            }
        }
        Commands::Tx { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                TxAction::Add {
                    user,
                    account,
                    category,
                    amount,
                    kind,
                    description,
                    date,
                    recurring,
                } => commands::cmd_tx_add(
                    &db,
                    user,
                    account,
                    category.as_deref(),
                    amount,
                    &kind,
                    description.as_deref(),
                    date.as_deref(),
                    recurring,
                ),
                TxAction::List { user, limit } => commands::cmd_tx_list(&db, user, limit),
            }
        }
        Commands::Transfer {
            user,
            account,
            category,
            amount,
            note,
        } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            commands::cmd_transfer(&db, user, account, &category, amount, note.as_deref())
        }
        Commands::Commit { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                CommitAction::Add {
                    user,
                    category,
                    amount,
                    due_day,
                } => commands::cmd_commit_add(&db, user, &category, amount, due_day),
                CommitAction::List { user } => commands::cmd_commit_list(&db, user),
                CommitAction::Pay { id } => commands::cmd_commit_pay(&db, id),
            }
        }
        Commands::Settings { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                SettingsAction::Set {
                    user,
                    notifications,
                    currency,
                    language,
                    dark_mode,
                } => commands::cmd_settings_set(
                    &db,
                    user,
                    notifications.as_deref(),
                    currency.as_deref(),
                    language.as_deref(),
                    dark_mode.as_deref(),
                ),
                SettingsAction::Show { user } => commands::cmd_settings_show(&db, user),
            }
        }
        Commands::Salary { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                SalaryAction::Set { user, amount, day } => {
                    commands::cmd_salary_set(&db, user, amount, day)
                }
            }
        }
        Commands::Insights { user } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            let advisor = minder_core::AdvisorClient::from_env();
            commands::cmd_insights_run(&db, advisor, user).await
        }
        Commands::Notifications { user, all, action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                None => commands::cmd_notifications(&db, user, all),
                Some(NotificationsAction::Read { id }) => commands::cmd_notifications_read(&db, id),
            }
        }
    }
}
