//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init/status/convert and shared utilities (open_db)
//! - `entities` - User, account, category, and budget commands
//! - `transactions` - Transaction recording, listing, and transfers
//! - `commitments` - Commitment add/list/pay commands
//! - `settings` - Settings and salary expectation commands
//! - `insights` - Insight cycle and notification commands

pub mod commitments;
pub mod core;
pub mod entities;
pub mod insights;
pub mod settings;
pub mod transactions;

// Re-export command functions for main.rs
pub use commitments::*;
pub use core::*;
pub use entities::*;
pub use insights::*;
pub use settings::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}
