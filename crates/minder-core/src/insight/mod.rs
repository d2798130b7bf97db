//! Financial Insight & Notification Engine
//!
//! The engine inspects a user's budgets, transactions, commitments, and
//! income/expense balance, derives findings, composes them into tips, and
//! persists the tips as notifications behind a daily dedup guard.
//!
//! ## Pipeline
//!
//! - `rules` - Pure evaluation of accessor readings into findings
//! - `schedule` - Commitment due/paid and salary reminder evaluation
//! - `compose` - Findings into templated or advisor-generated tip text
//! - `engine` - `run_insight_cycle` / `run_commitment_check` orchestration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minder_core::insight::run_insight_cycle;
//!
//! let advisor = AdvisorClient::from_env();
//! let report = run_insight_cycle(&db, advisor.as_ref(), user_id, now).await?;
//! ```

pub mod compose;
pub mod engine;
pub mod finding;
pub mod rules;
pub mod schedule;

pub use compose::{compose, ComposedTip, TipSource, TIP_UNAVAILABLE_PREFIX};
pub use engine::{run_commitment_check, run_insight_cycle, CycleReport};
pub use finding::{Finding, FindingKind};
pub use rules::{evaluate, InsightReadings, NEAR_LIMIT_THRESHOLD};
pub use schedule::{evaluate_commitments, evaluate_salary};
