//! Aggregate analytics counters.
//!
//! Counters only move forward (message appends, user creation) except on
//! an explicit full reset; retention pruning does not touch them.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{Analytics, DayStats};

/// Get the process-wide totals.
pub async fn get_analytics(pool: &SqlitePool) -> Result<Analytics> {
    let analytics = sqlx::query_as::<_, Analytics>(
        "SELECT total_users, total_messages FROM analytics WHERE id = 1",
    )
    .fetch_one(pool)
    .await?;

    Ok(analytics)
}

/// Get today's counters.
pub async fn today_stats(pool: &SqlitePool) -> Result<DayStats> {
    let stats = sqlx::query_as::<_, DayStats>(
        r#"
        SELECT
            date('now') AS day,
            COALESCE((SELECT messages FROM daily_stats WHERE day = date('now')), 0) AS messages,
            (SELECT COUNT(*) FROM daily_seen WHERE day = date('now')) AS unique_users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

/// Get per-day counters for the most recent `days` days that have data.
pub async fn recent_days(pool: &SqlitePool, days: i64) -> Result<Vec<DayStats>> {
    let stats = sqlx::query_as::<_, DayStats>(
        r#"
        SELECT
            s.day AS day,
            s.messages AS messages,
            (SELECT COUNT(*) FROM daily_seen d WHERE d.day = s.day) AS unique_users
        FROM daily_stats s
        ORDER BY s.day DESC
        LIMIT ?
        "#,
    )
    .bind(days)
    .fetch_all(pool)
    .await?;

    Ok(stats)
}

/// Zero every counter and drop the per-day rows. The only operation
/// allowed to decrease analytics.
pub async fn reset_analytics(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE analytics SET total_users = 0, total_messages = 0 WHERE id = 1")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM daily_stats").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM daily_seen").execute(&mut *tx).await?;

    tx.commit().await?;

    Ok(())
}
