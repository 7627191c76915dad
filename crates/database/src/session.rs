//! Continuation session rows.
//!
//! The orchestrator's in-memory session table is authoritative; these
//! rows mirror it so open continuations survive inspection and restarts.
//! Closing a session clears the backend handle but never touches the
//! user's message history.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Session;

/// Create or replace the session row for a user.
///
/// Replacing implicitly invalidates any previous handle: at most one
/// continuation exists per user.
pub async fn upsert_session(
    pool: &SqlitePool,
    user_id: &str,
    provider: &str,
    handle: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sessions (user_id, provider, handle, open)
        VALUES (?, ?, ?, 1)
        ON CONFLICT (user_id) DO UPDATE SET
            provider = excluded.provider,
            handle = excluded.handle,
            open = 1,
            last_activity = datetime('now')
        "#,
    )
    .bind(user_id)
    .bind(provider)
    .bind(handle)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the session row for a user, if any.
pub async fn get_session(pool: &SqlitePool, user_id: &str) -> Result<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        SELECT user_id, provider, handle, open, created_at, last_activity
        FROM sessions
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// Close a user's session and drop its backend handle.
pub async fn close_session(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE sessions
        SET open = 0, handle = NULL, last_activity = datetime('now')
        WHERE user_id = ? AND open = 1
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Close every open session. Returns how many were closed.
pub async fn close_all_sessions(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE sessions
        SET open = 0, handle = NULL, last_activity = datetime('now')
        WHERE open = 1
        "#,
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// List all open sessions.
pub async fn list_open_sessions(pool: &SqlitePool) -> Result<Vec<Session>> {
    let sessions = sqlx::query_as::<_, Session>(
        r#"
        SELECT user_id, provider, handle, open, created_at, last_activity
        FROM sessions
        WHERE open = 1
        ORDER BY last_activity DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}
