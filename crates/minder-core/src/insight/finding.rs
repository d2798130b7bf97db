//! Core finding types for the insight engine

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Commitment;

/// Kinds of findings the engine can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Spend in a category went past its budget
    BudgetExceeded,
    /// Spend in a category passed 80% of its budget
    BudgetNearLimit,
    /// The category collecting the most recurring-flagged transactions
    FrequentRecurring,
    /// Total expenses are larger than total income
    IncomeBelowExpense,
    /// Unpaid commitment whose due day already passed this month
    CommitmentOverdue,
    /// Unpaid commitment due today
    CommitmentDueToday,
    /// Unpaid commitment due within the next week
    CommitmentUpcoming,
    /// Salary expected within the next week
    SalaryUpcoming,
    /// Salary expected today
    SalaryDueToday,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::BudgetExceeded => "budget_exceeded",
            FindingKind::BudgetNearLimit => "budget_near_limit",
            FindingKind::FrequentRecurring => "frequent_recurring",
            FindingKind::IncomeBelowExpense => "income_below_expense",
            FindingKind::CommitmentOverdue => "commitment_overdue",
            FindingKind::CommitmentDueToday => "commitment_due_today",
            FindingKind::CommitmentUpcoming => "commitment_upcoming",
            FindingKind::SalaryUpcoming => "salary_upcoming",
            FindingKind::SalaryDueToday => "salary_due_today",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured fact derived from a user's financial data
///
/// Findings are ephemeral: they are composed into tips and persisted as
/// notifications, never stored directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Finding {
    BudgetExceeded {
        category: String,
        used: f64,
        limit: f64,
    },
    BudgetNearLimit {
        category: String,
        used: f64,
        limit: f64,
        /// used / limit * 100; rounded for display only, never for comparison
        percent: f64,
    },
    FrequentRecurring {
        category: String,
        count: i64,
    },
    IncomeBelowExpense {
        income: f64,
        expense: f64,
    },
    CommitmentOverdue {
        commitment: Commitment,
    },
    CommitmentDueToday {
        commitment: Commitment,
    },
    CommitmentUpcoming {
        commitment: Commitment,
        days: u32,
    },
    SalaryUpcoming {
        days: u32,
    },
    SalaryDueToday,
}

impl Finding {
    pub fn kind(&self) -> FindingKind {
        match self {
            Finding::BudgetExceeded { .. } => FindingKind::BudgetExceeded,
            Finding::BudgetNearLimit { .. } => FindingKind::BudgetNearLimit,
            Finding::FrequentRecurring { .. } => FindingKind::FrequentRecurring,
            Finding::IncomeBelowExpense { .. } => FindingKind::IncomeBelowExpense,
            Finding::CommitmentOverdue { .. } => FindingKind::CommitmentOverdue,
            Finding::CommitmentDueToday { .. } => FindingKind::CommitmentDueToday,
            Finding::CommitmentUpcoming { .. } => FindingKind::CommitmentUpcoming,
            Finding::SalaryUpcoming { .. } => FindingKind::SalaryUpcoming,
            Finding::SalaryDueToday => FindingKind::SalaryDueToday,
        }
    }
}
