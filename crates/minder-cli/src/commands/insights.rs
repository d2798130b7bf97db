//! Insight cycle and notification commands

use anyhow::{Context, Result};
use minder_core::db::Database;
use minder_core::insight::{run_commitment_check, run_insight_cycle, TIP_UNAVAILABLE_PREFIX};
use minder_core::{AdvisorBackend, AdvisorClient};

/// Number of notifications the dashboard view shows
const DISPLAY_CAP: usize = 3;

pub async fn cmd_insights_run(
    db: &Database,
    advisor: Option<AdvisorClient>,
    user_id: i64,
) -> Result<()> {
    println!("🔎 Running insight cycle for user {}...", user_id);

    match &advisor {
        Some(client) => {
            println!("   🤖 Advisor enabled ({} @ {})", client.model(), client.host());
            if !client.health_check().await {
                tracing::warn!(host = %client.host(), "Advisor unreachable, generated tips will fail");
            }
        }
        None => println!("   💡 Tip: Set ADVISOR_HOST for generated advice (using templates)"),
    }

    let now = chrono::Local::now().naive_local();
    let insight = run_insight_cycle(db, advisor.as_ref(), user_id, now)
        .await
        .context("Insight cycle failed")?;
    let commitment = run_commitment_check(db, user_id, now)
        .await
        .context("Commitment check failed")?;

    if let Some(reset) = commitment.reset {
        println!("   🔄 Monthly reset: cleared paid flag on {} commitment(s)", reset);
    }

    println!();
    println!("📊 Cycle Results");
    println!("   ─────────────────────────────");
    println!("   Findings: {}", insight.findings + commitment.findings);
    println!("   New notifications: {}", insight.created + commitment.created);
    println!(
        "   Already notified today: {}",
        insight.duplicates + commitment.duplicates
    );

    // Typed generation failures are rendered here, at the UI edge only
    for (kind, err) in insight.failures.iter().chain(commitment.failures.iter()) {
        println!("   {} {}: {}", TIP_UNAVAILABLE_PREFIX, kind, err);
    }

    println!();
    cmd_notifications(db, user_id, false)
}

pub fn cmd_notifications(db: &Database, user_id: i64, all: bool) -> Result<()> {
    let limit = if all { 1000 } else { DISPLAY_CAP };
    let notifications = db.recent_notifications(user_id, limit)?;

    if notifications.is_empty() {
        println!("🔕 No notifications for user {}.", user_id);
        return Ok(());
    }

    println!("🔔 Notifications");
    for n in &notifications {
        let marker = if n.is_read { " " } else { "•" };
        println!(
            "   {} [{}] {} ({})",
            marker,
            n.id,
            n.content,
            n.created_at.format("%Y-%m-%d")
        );
    }

    if !all {
        let unread = db.unread_notification_count(user_id)?;
        if unread > notifications.len() as i64 {
            println!("   ... use --all to see the rest");
        }
    }
    println!();
    Ok(())
}

pub fn cmd_notifications_read(db: &Database, notification_id: i64) -> Result<()> {
    db.mark_notification_read(notification_id)
        .context("Failed to mark notification read")?;
    println!("✅ Notification {} marked read", notification_id);
    Ok(())
}
