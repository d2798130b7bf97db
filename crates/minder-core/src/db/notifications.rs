//! Notification persistence and the daily dedup guard

use chrono::NaiveDateTime;
use regex::Regex;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::insight::TIP_UNAVAILABLE_PREFIX;
use crate::models::Notification;

/// Outcome of a notification insert attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Row was inserted, contains the new notification id
    Created(i64),
    /// Identical content already stored for this user on this calendar day
    Duplicate,
    /// Content refused by the store's content filter
    Filtered,
}

impl NotificationOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Content the store refuses regardless of dedup state: anything carrying the
/// composer's display sentinel, and text claiming spending exceeds income
fn is_blocked_content(content: &str) -> bool {
    if content.starts_with(TIP_UNAVAILABLE_PREFIX) {
        return true;
    }
    let solvency = Regex::new(r"(?i)spending (is more than|exceeds) your income")
        .expect("valid regex");
    solvency.is_match(content)
}

impl Database {
    /// Persist a notification, enforcing at most one identical notification
    /// per user per calendar day
    ///
    /// The dedup key is `(user_id, content, date(created_at))` with exact
    /// string equality on content. `now` is the caller's clock so a whole
    /// cycle shares one timestamp.
    pub fn create_notification(
        &self,
        user_id: i64,
        content: &str,
        now: NaiveDateTime,
    ) -> Result<NotificationOutcome> {
        if is_blocked_content(content) {
            debug!(user_id, "Notification content refused by filter");
            return Ok(NotificationOutcome::Filtered);
        }

        let conn = self.conn()?;
        let now_str = now.format("%Y-%m-%d %H:%M:%S").to_string();

        // Check for an identical notification stored today
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM notifications \
                 WHERE user_id = ? AND content = ? AND DATE(created_at) = DATE(?)",
                params![user_id, content, now_str],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            debug!(user_id, "Notification already stored today, skipping");
            return Ok(NotificationOutcome::Duplicate);
        }

        conn.execute(
            "INSERT INTO notifications (user_id, content, created_at) VALUES (?, ?, ?)",
            params![user_id, content, now_str],
        )?;

        Ok(NotificationOutcome::Created(conn.last_insert_rowid()))
    }

    /// A user's most recent notifications, newest first
    ///
    /// The UI typically shows a small display cap (e.g. the top 3).
    pub fn recent_notifications(&self, user_id: i64, limit: usize) -> Result<Vec<Notification>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, content, created_at, is_read FROM notifications \
             WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )?;
        let rows = stmt.query_map(params![user_id, limit], |row| {
            Ok(Notification {
                id: row.get(0)?,
                user_id: row.get(1)?,
                content: row.get(2)?,
                created_at: parse_datetime(&row.get::<_, String>(3)?),
                is_read: row.get(4)?,
            })
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Mark a notification as read
    pub fn mark_notification_read(&self, notification_id: i64) -> Result<()> {
        let conn = self.conn()?;

        let updated = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?",
            params![notification_id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!(
                "Notification {} not found",
                notification_id
            )));
        }

        Ok(())
    }

    /// Count of a user's unread notifications
    pub fn unread_notification_count(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;

        let count = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
            params![user_id],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn seed_user(db: &Database) -> i64 {
        db.insert_user("maya", "maya@example.com").unwrap()
    }

    #[test]
    fn test_same_day_dedup() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);

        let first = db
            .create_notification(user_id, "Budget warning", at(2026, 3, 10, 9))
            .unwrap();
        assert!(first.is_created());

        // Same content later the same day is refused
        let second = db
            .create_notification(user_id, "Budget warning", at(2026, 3, 10, 18))
            .unwrap();
        assert_eq!(second, NotificationOutcome::Duplicate);

        assert_eq!(db.recent_notifications(user_id, 10).unwrap().len(), 1);
    }

    #[test]
    fn test_next_day_stores_again() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);

        db.create_notification(user_id, "Budget warning", at(2026, 3, 10, 9))
            .unwrap();
        let next_day = db
            .create_notification(user_id, "Budget warning", at(2026, 3, 11, 9))
            .unwrap();
        assert!(next_day.is_created());

        assert_eq!(db.recent_notifications(user_id, 10).unwrap().len(), 2);
    }

    #[test]
    fn test_dedup_scoped_to_user() {
        let db = Database::in_memory().unwrap();
        let a = db.insert_user("a", "a@example.com").unwrap();
        let b = db.insert_user("b", "b@example.com").unwrap();

        assert!(db
            .create_notification(a, "Budget warning", at(2026, 3, 10, 9))
            .unwrap()
            .is_created());
        assert!(db
            .create_notification(b, "Budget warning", at(2026, 3, 10, 9))
            .unwrap()
            .is_created());
    }

    #[test]
    fn test_different_content_same_day() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);

        assert!(db
            .create_notification(user_id, "Tip one", at(2026, 3, 10, 9))
            .unwrap()
            .is_created());
        assert!(db
            .create_notification(user_id, "Tip two", at(2026, 3, 10, 9))
            .unwrap()
            .is_created());
    }

    #[test]
    fn test_filter_refuses_sentinel() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);

        let outcome = db
            .create_notification(
                user_id,
                &format!("{} the advisor timed out", TIP_UNAVAILABLE_PREFIX),
                at(2026, 3, 10, 9),
            )
            .unwrap();
        assert_eq!(outcome, NotificationOutcome::Filtered);
        assert!(db.recent_notifications(user_id, 10).unwrap().is_empty());
    }

    #[test]
    fn test_filter_refuses_solvency_phrase() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);

        for content in [
            "your spending is more than your income right now",
            "Your SPENDING EXCEEDS your income this month",
        ] {
            let outcome = db
                .create_notification(user_id, content, at(2026, 3, 10, 9))
                .unwrap();
            assert_eq!(outcome, NotificationOutcome::Filtered);
        }
    }

    #[test]
    fn test_read_flag_lifecycle() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);

        let id = match db
            .create_notification(user_id, "Tip", at(2026, 3, 10, 9))
            .unwrap()
        {
            NotificationOutcome::Created(id) => id,
            other => panic!("expected Created, got {:?}", other),
        };

        assert_eq!(db.unread_notification_count(user_id).unwrap(), 1);
        db.mark_notification_read(id).unwrap();
        assert_eq!(db.unread_notification_count(user_id).unwrap(), 0);
        assert!(db.recent_notifications(user_id, 10).unwrap()[0].is_read);
    }

    #[test]
    fn test_recent_order_and_cap() {
        let db = Database::in_memory().unwrap();
        let user_id = seed_user(&db);

        for (day, content) in [(8, "oldest"), (9, "middle"), (10, "newest")] {
            db.create_notification(user_id, content, at(2026, 3, day, 9))
                .unwrap();
        }

        let top = db.recent_notifications(user_id, 2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].content, "newest");
        assert_eq!(top[1].content, "middle");
    }
}
