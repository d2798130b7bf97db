//! Tip composer: findings into natural-language tip text
//!
//! Budget and solvency findings go to the advisor when one is configured;
//! everything else, and everything when no advisor is available, uses fixed
//! templates. The composer never fails: a generation error becomes a typed
//! `ComposedTip::Unavailable` value that callers report but never persist.

use tracing::debug;

use crate::ai::{AdvisorBackend, AdvisorClient, AdvisorError};

use super::finding::Finding;

/// Display prefix for a failed generation, used only at the UI edge
///
/// The notification store also refuses any content starting with this prefix
/// as an independent safety rule.
pub const TIP_UNAVAILABLE_PREFIX: &str = "[tip unavailable]";

/// How a tip's text was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipSource {
    /// Fixed-format string with interpolated values
    Templated,
    /// Advisor-generated natural language
    Generated,
}

/// Outcome of composing one finding
#[derive(Debug, Clone, PartialEq)]
pub enum ComposedTip {
    /// Tip text ready to persist
    Ready { text: String, source: TipSource },
    /// Generation failed; nothing to persist for this finding
    Unavailable(AdvisorError),
}

impl ComposedTip {
    /// Render for display. Only UI-edge code should call this; the pipeline
    /// itself works on the typed variants.
    pub fn display_text(&self) -> String {
        match self {
            ComposedTip::Ready { text, .. } => text.clone(),
            ComposedTip::Unavailable(err) => format!("{} {}", TIP_UNAVAILABLE_PREFIX, err),
        }
    }
}

/// Compose a finding into a tip
///
/// With an advisor configured, budget and solvency findings are summarized
/// and sent for generation; a generation failure surfaces as `Unavailable`,
/// never as a panic or error. All other findings, and all findings when no
/// advisor is configured, use templates.
pub async fn compose(finding: &Finding, advisor: Option<&AdvisorClient>) -> ComposedTip {
    let (Some(advisor), Some(summary)) = (advisor, generation_summary(finding)) else {
        return ComposedTip::Ready {
            text: template(finding),
            source: TipSource::Templated,
        };
    };

    match advisor.generate_tip(&summary).await {
        Ok(text) => ComposedTip::Ready {
            text,
            source: TipSource::Generated,
        },
        Err(err) => {
            debug!(kind = %finding.kind(), error = %err, "Tip generation failed");
            ComposedTip::Unavailable(err)
        }
    }
}

/// One-line summary sent to the advisor, for the findings that warrant
/// generated advice. Returns None for template-only findings.
fn generation_summary(finding: &Finding) -> Option<String> {
    match finding {
        Finding::BudgetExceeded { category, used, limit } => Some(format!(
            "user exceeded their {} budget by ${:.2}",
            category,
            used - limit
        )),
        Finding::BudgetNearLimit { category, percent, .. } => Some(format!(
            "user is close to the limit on their {} budget ({:.0}% used)",
            category,
            percent.round()
        )),
        Finding::IncomeBelowExpense { income, expense } => Some(format!(
            "user's spending (${:.2}) is more than their income (${:.2}) right now",
            expense, income
        )),
        _ => None,
    }
}

/// Fixed-format tip text for a finding
fn template(finding: &Finding) -> String {
    match finding {
        Finding::BudgetExceeded { category, used, limit } => format!(
            "you went over your {} budget by ${:.2}",
            category,
            used - limit
        ),
        Finding::BudgetNearLimit { category, percent, .. } => format!(
            "you're close to the limit on {} ({:.0}% used), careful spending",
            category,
            percent.round()
        ),
        Finding::FrequentRecurring { category, .. } => {
            format!("you have frequent recurring txns in {}", category)
        }
        // Deliberately matches the notification store's solvency phrase
        // filter, so the templated form is evaluated but never persisted
        Finding::IncomeBelowExpense { .. } => {
            "your spending is more than your income right now".to_string()
        }
        Finding::CommitmentOverdue { commitment } => format!(
            "⚠️ '{}' commitment overdue! Pay {:.2}",
            commitment.category_name, commitment.amount
        ),
        Finding::CommitmentDueToday { commitment } => format!(
            "📅 '{}' is due today: {:.2}",
            commitment.category_name, commitment.amount
        ),
        Finding::CommitmentUpcoming { commitment, days } => format!(
            "🔔 Reminder: '{}' due in {} days",
            commitment.category_name, days
        ),
        Finding::SalaryUpcoming { days } => format!(
            "💼 Your salary is expected in {} day(s). Don't forget your commitments.",
            days
        ),
        Finding::SalaryDueToday => {
            "💸 It's salary day today! Review your commitments and savings goals.".to_string()
        }
    }
}
