//! Commitment and salary reminder evaluation
//!
//! Both rules compare `due_day`/`expected_day` against today's day-of-month
//! as a plain integer. A due day of 31 in a 30-day month is therefore never
//! "due today" that month; this mirrors the stored data and is a documented
//! limitation, not corrected here.

use chrono::{Datelike, NaiveDate};

use crate::models::{Commitment, SalaryExpectation};

use super::finding::Finding;

/// Days ahead within which an unpaid commitment gets a reminder
const REMINDER_WINDOW_DAYS: u32 = 7;

/// Evaluate commitment findings for one user
///
/// `notifications_enabled` is the settings gate, passed in explicitly so the
/// function stays pure. When false the whole evaluation short-circuits and no
/// commitment finding is produced at all. Paid commitments never produce
/// findings regardless of their due day.
pub fn evaluate_commitments(
    commitments: &[Commitment],
    notifications_enabled: bool,
    today: NaiveDate,
) -> Vec<Finding> {
    if !notifications_enabled {
        return Vec::new();
    }

    let today_day = today.day();
    let mut findings = Vec::new();

    for commitment in commitments {
        if commitment.is_paid {
            continue;
        }

        if commitment.due_day < today_day {
            findings.push(Finding::CommitmentOverdue {
                commitment: commitment.clone(),
            });
        } else if commitment.due_day == today_day {
            findings.push(Finding::CommitmentDueToday {
                commitment: commitment.clone(),
            });
        } else {
            let days = commitment.due_day - today_day;
            if days <= REMINDER_WINDOW_DAYS {
                findings.push(Finding::CommitmentUpcoming {
                    commitment: commitment.clone(),
                    days,
                });
            }
        }
    }

    findings
}

/// Evaluate the salary reminder for one user
///
/// Not gated by `notifications_enabled`; salary reminders always flow through
/// the composer and the dedup guard.
pub fn evaluate_salary(
    expectation: Option<&SalaryExpectation>,
    today: NaiveDate,
) -> Vec<Finding> {
    let Some(expectation) = expectation else {
        return Vec::new();
    };

    let today_day = today.day();
    if expectation.expected_day == today_day {
        vec![Finding::SalaryDueToday]
    } else if expectation.expected_day > today_day
        && expectation.expected_day - today_day <= REMINDER_WINDOW_DAYS
    {
        vec![Finding::SalaryUpcoming {
            days: expectation.expected_day - today_day,
        }]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::FindingKind;
    use chrono::Utc;

    fn commitment(due_day: u32, is_paid: bool) -> Commitment {
        Commitment {
            id: 1,
            user_id: 1,
            category_id: 1,
            category_name: "Rent".to_string(),
            amount: 900.0,
            due_day,
            is_paid,
            last_paid_date: None,
            created_at: Utc::now(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_upcoming_due_today_overdue() {
        let commitments = vec![commitment(5, false)];

        let upcoming = evaluate_commitments(&commitments, true, day(3));
        assert_eq!(upcoming.len(), 1);
        match &upcoming[0] {
            Finding::CommitmentUpcoming { days, .. } => assert_eq!(*days, 2),
            other => panic!("expected CommitmentUpcoming, got {:?}", other),
        }

        let due = evaluate_commitments(&commitments, true, day(5));
        assert_eq!(due[0].kind(), FindingKind::CommitmentDueToday);

        let overdue = evaluate_commitments(&commitments, true, day(10));
        assert_eq!(overdue[0].kind(), FindingKind::CommitmentOverdue);
    }

    #[test]
    fn test_reminder_window_bounds() {
        // Exactly 7 days out is still a reminder; 8 is not
        let in_window = evaluate_commitments(&[commitment(10, false)], true, day(3));
        assert_eq!(in_window.len(), 1);

        let outside = evaluate_commitments(&[commitment(11, false)], true, day(3));
        assert!(outside.is_empty());
    }

    #[test]
    fn test_paid_commitment_is_silent() {
        let commitments = vec![commitment(5, true)];
        for today in [day(3), day(5), day(10)] {
            assert!(evaluate_commitments(&commitments, true, today).is_empty());
        }
    }

    #[test]
    fn test_disabled_short_circuits() {
        let commitments = vec![commitment(5, false), commitment(2, false)];
        assert!(evaluate_commitments(&commitments, false, day(5)).is_empty());
    }

    #[test]
    fn test_due_day_past_month_end_never_due_today() {
        // Integer comparison only: day 31 in a 30-day month stays "upcoming"
        // within the window and is otherwise silent
        let commitments = vec![commitment(31, false)];
        let april_28 = NaiveDate::from_ymd_opt(2026, 4, 28).unwrap();
        let findings = evaluate_commitments(&commitments, true, april_28);
        assert_eq!(findings[0].kind(), FindingKind::CommitmentUpcoming);
    }

    #[test]
    fn test_salary_windows() {
        let expectation = SalaryExpectation {
            user_id: 1,
            expected_amount: 3200.0,
            expected_day: 25,
        };

        let upcoming = evaluate_salary(Some(&expectation), day(20));
        match &upcoming[0] {
            Finding::SalaryUpcoming { days } => assert_eq!(*days, 5),
            other => panic!("expected SalaryUpcoming, got {:?}", other),
        }

        let today = evaluate_salary(Some(&expectation), day(25));
        assert_eq!(today[0].kind(), FindingKind::SalaryDueToday);

        // Already past, or too far out
        assert!(evaluate_salary(Some(&expectation), day(26)).is_empty());
        assert!(evaluate_salary(Some(&expectation), day(10)).is_empty());

        // No expectation row
        assert!(evaluate_salary(None, day(25)).is_empty());
    }
}
