//! Engine entry points: orchestrate accessor, rules, composer, and store

use chrono::{Datelike, NaiveDateTime};
use tracing::{info, warn};

use crate::ai::{AdvisorClient, AdvisorError};
use crate::db::{Database, NotificationOutcome};
use crate::error::Result;

use super::compose::{compose, ComposedTip};
use super::finding::{Finding, FindingKind};
use super::rules::{evaluate, InsightReadings};
use super::schedule::{evaluate_commitments, evaluate_salary};

/// What one engine invocation did
///
/// Storage errors abort the cycle; everything here describes a cycle that
/// ran to completion. Generation failures are carried as typed values for
/// the UI edge to render, never persisted.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Findings the rules produced
    pub findings: usize,
    /// Notifications inserted
    pub created: usize,
    /// Tips skipped because identical content was already stored today
    pub duplicates: usize,
    /// Tips refused by the store's content filter
    pub filtered: usize,
    /// Findings whose generation failed (nothing persisted for these)
    pub failures: Vec<(FindingKind, AdvisorError)>,
    /// Commitments whose paid flag the monthly reset cleared, when it ran
    pub reset: Option<usize>,
}

impl CycleReport {
    /// Persist findings one at a time so each tip is checked against the
    /// history the previous one just grew; two near-identical findings in
    /// one cycle must not both slip past the dedup guard.
    async fn persist_all(
        &mut self,
        db: &Database,
        advisor: Option<&AdvisorClient>,
        user_id: i64,
        findings: &[Finding],
        now: NaiveDateTime,
    ) -> Result<()> {
        self.findings += findings.len();

        for finding in findings {
            match compose(finding, advisor).await {
                ComposedTip::Ready { text, .. } => {
                    match db.create_notification(user_id, &text, now)? {
                        NotificationOutcome::Created(_) => self.created += 1,
                        NotificationOutcome::Duplicate => self.duplicates += 1,
                        NotificationOutcome::Filtered => self.filtered += 1,
                    }
                }
                ComposedTip::Unavailable(err) => {
                    warn!(user_id, kind = %finding.kind(), error = %err,
                        "Tip generation failed, skipping finding");
                    self.failures.push((finding.kind(), err));
                }
            }
        }

        Ok(())
    }
}

/// Run one insight cycle for a user
///
/// Data accessor, rule evaluator, tip composer, notification store, in that
/// order. Safe to invoke on every dashboard load: the dedup guard keeps
/// repeat runs from spamming. Only storage errors propagate; a generation
/// failure degrades to no notification for that finding and the rest of the
/// cycle continues.
pub async fn run_insight_cycle(
    db: &Database,
    advisor: Option<&AdvisorClient>,
    user_id: i64,
    now: NaiveDateTime,
) -> Result<CycleReport> {
    let readings = InsightReadings {
        budgets: db.budget_usage(user_id)?,
        top_recurring: db.top_recurring_category(user_id)?,
        totals: db.income_expense_totals(user_id)?,
    };

    let findings = evaluate(&readings);
    let mut report = CycleReport::default();
    report
        .persist_all(db, advisor, user_id, &findings, now)
        .await?;

    info!(
        user_id,
        findings = report.findings,
        created = report.created,
        duplicates = report.duplicates,
        filtered = report.filtered,
        failed = report.failures.len(),
        "Insight cycle complete"
    );

    Ok(report)
}

/// Run the commitment scheduler for a user
///
/// Performs the monthly reset when today is the 1st (idempotent), then
/// evaluates commitment findings gated by the user's settings (a missing
/// settings row counts as notifications disabled) and salary reminders,
/// which are not gated. All tips on this path are templated.
pub async fn run_commitment_check(
    db: &Database,
    user_id: i64,
    now: NaiveDateTime,
) -> Result<CycleReport> {
    let today = now.date();
    let mut report = CycleReport::default();

    if today.day() == 1 {
        report.reset = Some(db.reset_commitments(user_id)?);
    }

    let notifications_enabled = db
        .get_settings(user_id)?
        .map(|s| s.notifications_enabled)
        .unwrap_or(false);

    let commitments = db.commitments(user_id)?;
    let mut findings = evaluate_commitments(&commitments, notifications_enabled, today);
    findings.extend(evaluate_salary(
        db.get_salary_expectation(user_id)?.as_ref(),
        today,
    ));

    report
        .persist_all(db, None, user_id, &findings, now)
        .await?;

    info!(
        user_id,
        findings = report.findings,
        created = report.created,
        reset = report.reset,
        "Commitment check complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::models::{NewTransaction, Settings, TransactionType};
    use chrono::NaiveDate;

    fn at(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn seed(db: &Database) -> (i64, i64, i64) {
        let user_id = db.insert_user("maya", "maya@example.com").unwrap();
        let account_id = db.add_account(user_id, "Test", None, "USD").unwrap();
        let category_id = db.add_category(user_id, "Food", None).unwrap();
        (user_id, account_id, category_id)
    }

    fn spend(db: &Database, user_id: i64, account_id: i64, category_id: i64, amount: f64) {
        db.insert_transaction(
            user_id,
            &NewTransaction {
                account_id,
                category_id: Some(category_id),
                amount,
                transaction_type: TransactionType::Expense,
                description: None,
                date: at(5).date(),
                is_recurring: false,
            },
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_cycle_persists_once_per_day() {
        let db = Database::in_memory().unwrap();
        let (user_id, account_id, category_id) = seed(&db);
        db.set_budget(user_id, category_id, 100.0).unwrap();
        spend(&db, user_id, account_id, category_id, 120.0);

        // BudgetExceeded persists; the templated solvency tip is filtered
        let first = run_insight_cycle(&db, None, user_id, at(10)).await.unwrap();
        assert_eq!(first.findings, 2);
        assert_eq!(first.created, 1);
        assert_eq!(first.filtered, 1);

        let second = run_insight_cycle(&db, None, user_id, at(10)).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.duplicates, 1);
        assert_eq!(second.filtered, 1);

        assert_eq!(db.recent_notifications(user_id, 10).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generation_failure_degrades_gracefully() {
        let db = Database::in_memory().unwrap();
        let (user_id, account_id, category_id) = seed(&db);
        db.set_budget(user_id, category_id, 100.0).unwrap();
        spend(&db, user_id, account_id, category_id, 120.0);

        let advisor = AdvisorClient::Mock(MockBackend::failing(AdvisorError::RateLimited));
        let report = run_insight_cycle(&db, Some(&advisor), user_id, at(10))
            .await
            .unwrap();

        // Both generated-path findings fail; nothing persisted, cycle completes
        assert_eq!(report.findings, 2);
        assert_eq!(report.created, 0);
        assert_eq!(report.failures.len(), 2);
        assert!(report
            .failures
            .iter()
            .all(|(_, e)| *e == AdvisorError::RateLimited));
        assert!(db.recent_notifications(user_id, 10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generated_solvency_tip_persists() {
        let db = Database::in_memory().unwrap();
        let (user_id, account_id, category_id) = seed(&db);
        spend(&db, user_id, account_id, category_id, 50.0);

        // The mock's generated phrasing does not match the solvency filter
        let advisor = AdvisorClient::Mock(MockBackend::new());
        let report = run_insight_cycle(&db, Some(&advisor), user_id, at(10))
            .await
            .unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.filtered, 0);
    }

    #[tokio::test]
    async fn test_commitment_check_respects_settings_gate() {
        let db = Database::in_memory().unwrap();
        let (user_id, _, category_id) = seed(&db);
        db.add_commitment(user_id, category_id, 60.0, 5).unwrap();
        db.set_salary_expectation(user_id, 3200.0, 8).unwrap();

        // No settings row counts as disabled: commitment silent, salary not
        let report = run_commitment_check(&db, user_id, at(5)).await.unwrap();
        assert_eq!(report.findings, 1);
        let stored = db.recent_notifications(user_id, 10).unwrap();
        assert!(stored[0].content.contains("salary"));

        let mut settings = Settings::defaults(user_id);
        settings.notifications_enabled = true;
        db.upsert_settings(&settings).unwrap();

        let report = run_commitment_check(&db, user_id, at(5)).await.unwrap();
        assert_eq!(report.findings, 2);
        assert_eq!(report.created, 1); // salary tip deduped, commitment new
        assert_eq!(report.duplicates, 1);
    }

    #[tokio::test]
    async fn test_monthly_reset_on_day_one() {
        let db = Database::in_memory().unwrap();
        let (user_id, _, category_id) = seed(&db);
        let commitment_id = db.add_commitment(user_id, category_id, 60.0, 5).unwrap();
        db.mark_commitment_paid(commitment_id).unwrap();
        db.upsert_settings(&Settings::defaults(user_id)).unwrap();

        // Paid and not the 1st: no reset, no finding
        let report = run_commitment_check(&db, user_id, at(10)).await.unwrap();
        assert_eq!(report.reset, None);
        assert_eq!(report.findings, 0);

        // On the 1st the paid flag clears and the due-in-4-days reminder fires
        let report = run_commitment_check(&db, user_id, at(1)).await.unwrap();
        assert_eq!(report.reset, Some(1));
        assert_eq!(report.findings, 1);
        assert!(!db.commitments(user_id).unwrap()[0].is_paid);

        // Running again on the 1st is harmless
        let report = run_commitment_check(&db, user_id, at(1)).await.unwrap();
        assert_eq!(report.reset, Some(1));
        assert_eq!(report.duplicates, 1);
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let db = Database::in_memory().unwrap();
        let (user_id, _, _) = seed(&db);
        {
            let conn = db.conn().unwrap();
            conn.execute_batch("DROP TABLE transactions").unwrap();
        }

        assert!(run_insight_cycle(&db, None, user_id, at(10)).await.is_err());
    }
}
