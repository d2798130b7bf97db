//! Minder Core Library
//!
//! Shared functionality for the Minder personal finance tool:
//! - Database access and migrations (SQLCipher-encrypted SQLite)
//! - The Financial Insight & Notification Engine (rules, scheduler,
//!   tip composer, dedup guard)
//! - Pluggable advisor backends for generated tips (OpenAI-compatible)
//! - Currency display conversion

pub mod ai;
pub mod currency;
pub mod db;
pub mod error;
pub mod insight;
pub mod models;

/// Test utilities including the mock advisor server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AdvisorBackend, AdvisorClient, AdvisorError, MockBackend, OpenAICompatibleBackend};
pub use currency::CurrencyConverter;
pub use db::{Database, NotificationOutcome};
pub use error::{Error, Result};
pub use insight::{
    compose, evaluate, run_commitment_check, run_insight_cycle, ComposedTip, CycleReport, Finding,
    FindingKind, InsightReadings, TipSource, TIP_UNAVAILABLE_PREFIX,
};
