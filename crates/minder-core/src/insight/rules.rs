//! Rule evaluator: pure functions from accessor readings to findings

use crate::models::{BudgetUsage, CashflowTotals, RecurringUsage};

use super::finding::Finding;

/// Fraction of a budget that counts as "near the limit"
pub const NEAR_LIMIT_THRESHOLD: f64 = 0.8;

/// Accessor readings consumed by one evaluation pass
///
/// Gathered by the engine from the data accessor so the rules themselves
/// never touch the store.
#[derive(Debug, Clone, Default)]
pub struct InsightReadings {
    /// Every category with a budget set, with derived spend
    pub budgets: Vec<BudgetUsage>,
    /// The category collecting the most recurring-flagged transactions
    pub top_recurring: Option<RecurringUsage>,
    /// Income and expense totals across all transactions
    pub totals: CashflowTotals,
}

/// Evaluate all insight rules over one user's readings
///
/// Stateless; output order is fixed (budget findings in category order, then
/// the recurring finding, then solvency). Commitment and salary rules live in
/// the scheduler because they depend on the calendar day.
pub fn evaluate(readings: &InsightReadings) -> Vec<Finding> {
    let mut findings = Vec::new();

    // Budget rules: exceeded and near-limit are mutually exclusive per
    // category. Rows with limit == 0 never reach us.
    for usage in &readings.budgets {
        if usage.used > usage.limit {
            findings.push(Finding::BudgetExceeded {
                category: usage.category_name.clone(),
                used: usage.used,
                limit: usage.limit,
            });
        } else if usage.used > NEAR_LIMIT_THRESHOLD * usage.limit {
            findings.push(Finding::BudgetNearLimit {
                category: usage.category_name.clone(),
                used: usage.used,
                limit: usage.limit,
                percent: usage.used / usage.limit * 100.0,
            });
        }
    }

    // Recurring rule: informational, so even a single recurring transaction
    // triggers it.
    if let Some(top) = &readings.top_recurring {
        findings.push(Finding::FrequentRecurring {
            category: top.category_name.clone(),
            count: top.count,
        });
    }

    // Solvency rule: strict comparison, so a user with no transactions
    // (0 > 0) never triggers.
    if readings.totals.expense > readings.totals.income {
        findings.push(Finding::IncomeBelowExpense {
            income: readings.totals.income,
            expense: readings.totals.expense,
        });
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::FindingKind;

    fn usage(name: &str, limit: f64, used: f64) -> BudgetUsage {
        BudgetUsage {
            category_id: 1,
            category_name: name.to_string(),
            limit,
            used,
        }
    }

    #[test]
    fn test_budget_exceeded() {
        let readings = InsightReadings {
            budgets: vec![usage("Food", 100.0, 120.0)],
            ..Default::default()
        };

        let findings = evaluate(&readings);
        assert_eq!(findings.len(), 1);
        match &findings[0] {
            Finding::BudgetExceeded { category, used, limit } => {
                assert_eq!(category, "Food");
                assert_eq!(used - limit, 20.0);
            }
            other => panic!("expected BudgetExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_budget_near_limit_percent() {
        let readings = InsightReadings {
            budgets: vec![usage("Food", 100.0, 85.0)],
            ..Default::default()
        };

        let findings = evaluate(&readings);
        assert_eq!(findings.len(), 1);
        match &findings[0] {
            Finding::BudgetNearLimit { percent, .. } => {
                assert!((percent - 85.0).abs() < 1e-9);
            }
            other => panic!("expected BudgetNearLimit, got {:?}", other),
        }
    }

    #[test]
    fn test_budget_findings_mutually_exclusive() {
        // One exceeded, one near-limit, one comfortably under
        let readings = InsightReadings {
            budgets: vec![
                usage("Food", 100.0, 150.0),
                usage("Fun", 200.0, 170.0),
                usage("Gas", 300.0, 50.0),
            ],
            ..Default::default()
        };

        let findings = evaluate(&readings);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].kind(), FindingKind::BudgetExceeded);
        assert_eq!(findings[1].kind(), FindingKind::BudgetNearLimit);
    }

    #[test]
    fn test_used_exactly_at_limit_is_near_not_exceeded() {
        let readings = InsightReadings {
            budgets: vec![usage("Food", 100.0, 100.0)],
            ..Default::default()
        };

        let findings = evaluate(&readings);
        assert_eq!(findings[0].kind(), FindingKind::BudgetNearLimit);
    }

    #[test]
    fn test_used_at_threshold_is_not_near_limit() {
        // used > 0.8 * limit is strict
        let readings = InsightReadings {
            budgets: vec![usage("Food", 100.0, 80.0)],
            ..Default::default()
        };

        assert!(evaluate(&readings).is_empty());
    }

    #[test]
    fn test_recurring_triggers_on_count_of_one() {
        let readings = InsightReadings {
            top_recurring: Some(RecurringUsage {
                category_id: 3,
                category_name: "Subscriptions".to_string(),
                count: 1,
            }),
            ..Default::default()
        };

        let findings = evaluate(&readings);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind(), FindingKind::FrequentRecurring);
    }

    #[test]
    fn test_solvency_strict_comparison() {
        let over = InsightReadings {
            totals: CashflowTotals {
                income: 100.0,
                expense: 150.0,
            },
            ..Default::default()
        };
        assert_eq!(evaluate(&over).len(), 1);
        assert_eq!(evaluate(&over)[0].kind(), FindingKind::IncomeBelowExpense);

        let zero = InsightReadings::default();
        assert!(evaluate(&zero).is_empty());

        let balanced = InsightReadings {
            totals: CashflowTotals {
                income: 100.0,
                expense: 100.0,
            },
            ..Default::default()
        };
        assert!(evaluate(&balanced).is_empty());
    }

    #[test]
    fn test_output_order_is_fixed() {
        let readings = InsightReadings {
            budgets: vec![usage("Food", 100.0, 120.0)],
            top_recurring: Some(RecurringUsage {
                category_id: 3,
                category_name: "Subscriptions".to_string(),
                count: 4,
            }),
            totals: CashflowTotals {
                income: 10.0,
                expense: 120.0,
            },
        };

        let kinds: Vec<_> = evaluate(&readings).iter().map(|f| f.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                FindingKind::BudgetExceeded,
                FindingKind::FrequentRecurring,
                FindingKind::IncomeBelowExpense,
            ]
        );
    }
}
