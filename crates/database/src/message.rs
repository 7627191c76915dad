//! Append-only message history operations.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;
use crate::models::Message;

/// Append one message to a user's history.
///
/// From-user messages also bump the user's `message_count` and
/// `last_seen`, and mark the user as seen today. All counters move in
/// the same transaction as the insert, so history and analytics cannot
/// drift apart.
pub async fn append_message(
    pool: &SqlitePool,
    user_id: &str,
    content: &str,
    from_user: bool,
) -> Result<Message> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO messages (user_id, content, from_user)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(content)
    .bind(from_user)
    .execute(&mut *tx)
    .await?;

    if from_user {
        sqlx::query(
            r#"
            UPDATE users
            SET message_count = message_count + 1, last_seen = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO daily_seen (day, user_id)
            VALUES (date('now'), ?)
            ON CONFLICT (day, user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE analytics SET total_messages = total_messages + 1 WHERE id = 1")
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO daily_stats (day, messages)
        VALUES (date('now'), 1)
        ON CONFLICT (day) DO UPDATE SET messages = messages + 1
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let message = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, user_id, content, from_user, kind, created_at
        FROM messages
        WHERE id = ?
        "#,
    )
    .bind(inserted.last_insert_rowid())
    .fetch_one(pool)
    .await?;

    Ok(message)
}

/// Get the last `limit` messages for a user, oldest first.
pub async fn get_history(pool: &SqlitePool, user_id: &str, limit: i64) -> Result<Vec<Message>> {
    let mut messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, user_id, content, from_user, kind, created_at
        FROM messages
        WHERE user_id = ?
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    messages.reverse();
    Ok(messages)
}

/// Count a user's from-user messages.
pub async fn count_from_user(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM messages WHERE user_id = ? AND from_user = 1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    Ok(count.0)
}

/// Delete messages (and daily rows) older than `days` days.
///
/// Aggregate analytics counters are untouched; only the raw rows go.
/// Returns the number of messages removed.
pub async fn prune_older_than(pool: &SqlitePool, days: i64) -> Result<u64> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(
        r#"
        DELETE FROM messages
        WHERE created_at < datetime('now', '-' || ? || ' days')
        "#,
    )
    .bind(days)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query("DELETE FROM daily_stats WHERE day < date('now', '-' || ? || ' days')")
        .bind(days)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM daily_seen WHERE day < date('now', '-' || ? || ' days')")
        .bind(days)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("Pruned {} messages older than {} days", removed, days);

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{user, Database};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn append_preserves_order() {
        let db = test_db().await;
        user::create_user(db.pool(), "+628111", "").await.unwrap();

        append_message(db.pool(), "+628111", "first", true)
            .await
            .unwrap();
        append_message(db.pool(), "+628111", "reply", false)
            .await
            .unwrap();
        append_message(db.pool(), "+628111", "second", true)
            .await
            .unwrap();

        let history = get_history(db.pool(), "+628111", 10).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[1].content, "reply");
        assert_eq!(history[2].content, "second");
        assert!(history[0].from_user);
        assert!(!history[1].from_user);
    }

    #[tokio::test]
    async fn history_limit_keeps_newest() {
        let db = test_db().await;
        user::create_user(db.pool(), "+628111", "").await.unwrap();

        for i in 0..5 {
            append_message(db.pool(), "+628111", &format!("msg {}", i), true)
                .await
                .unwrap();
        }

        let history = get_history(db.pool(), "+628111", 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "msg 3");
        assert_eq!(history[1].content, "msg 4");
    }

    #[tokio::test]
    async fn message_count_matches_from_user_rows() {
        let db = test_db().await;
        user::create_user(db.pool(), "+628111", "").await.unwrap();

        for _ in 0..3 {
            append_message(db.pool(), "+628111", "hi", true).await.unwrap();
            append_message(db.pool(), "+628111", "reply", false)
                .await
                .unwrap();
        }

        let user = user::get_user(db.pool(), "+628111").await.unwrap();
        assert_eq!(user.message_count, 3);
        assert_eq!(count_from_user(db.pool(), "+628111").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn prune_keeps_recent_messages() {
        let db = test_db().await;
        user::create_user(db.pool(), "+628111", "").await.unwrap();
        append_message(db.pool(), "+628111", "recent", true)
            .await
            .unwrap();

        let removed = prune_older_than(db.pool(), 30).await.unwrap();
        assert_eq!(removed, 0);

        let history = get_history(db.pool(), "+628111", 10).await.unwrap();
        assert_eq!(history.len(), 1);
    }
}
