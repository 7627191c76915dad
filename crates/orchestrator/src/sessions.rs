//! The continuation session table.
//!
//! An explicit table owned by the orchestrator, mapping user ID to the
//! open continuation for the active stateful provider. All mutations go
//! through accessor methods so a per-key lock can be added later without
//! touching callers. The store's session rows are a best-effort mirror:
//! a failed row write is logged and never fails the turn.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use database::{session as session_store, Database};
use provider_core::Continuation;
use tokio::sync::Mutex;
use tracing::warn;

struct SessionEntry {
    continuation: Continuation,
    last_activity: Instant,
}

/// In-memory table of open continuations, keyed by user ID.
pub struct SessionTable {
    inner: Mutex<HashMap<String, SessionEntry>>,
    db: Database,
}

impl SessionTable {
    /// Create an empty session table mirrored to `db`.
    pub fn new(db: Database) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            db,
        }
    }

    /// Take the user's continuation for a turn, if one is open and fresh.
    ///
    /// The entry is removed while in use; callers put it back on success
    /// or leave it out to discard it. An entry idle longer than `idle`
    /// is discarded here so the turn reopens from persisted history.
    pub async fn resume(&self, user_id: &str, idle: Duration) -> Option<Continuation> {
        let entry = self.inner.lock().await.remove(user_id)?;

        if entry.last_activity.elapsed() > idle {
            self.close_row(user_id).await;
            return None;
        }

        Some(entry.continuation)
    }

    /// Store the user's continuation after a successful turn.
    ///
    /// Replaces any previous entry, which implicitly invalidates the old
    /// backend handle.
    pub async fn put(&self, user_id: &str, continuation: Continuation) {
        let provider = continuation.provider.clone();
        let handle = serde_json::to_string(&continuation).ok();

        self.inner.lock().await.insert(
            user_id.to_string(),
            SessionEntry {
                continuation,
                last_activity: Instant::now(),
            },
        );

        if let Some(handle) = handle {
            if let Err(e) =
                session_store::upsert_session(self.db.pool(), user_id, &provider, &handle).await
            {
                warn!("Failed to mirror session for {}: {}", user_id, e);
            }
        }
    }

    /// Discard the user's continuation. History is untouched.
    ///
    /// Returns whether an in-memory entry existed.
    pub async fn discard(&self, user_id: &str) -> bool {
        let existed = self.inner.lock().await.remove(user_id).is_some();
        self.close_row(user_id).await;
        existed
    }

    /// Discard every continuation. Returns how many were open.
    pub async fn clear_all(&self) -> usize {
        let count = {
            let mut table = self.inner.lock().await;
            let count = table.len();
            table.clear();
            count
        };

        if let Err(e) = session_store::close_all_sessions(self.db.pool()).await {
            warn!("Failed to close mirrored sessions: {}", e);
        }

        count
    }

    /// Number of open continuations.
    pub async fn count(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// User IDs with an open continuation, sorted.
    pub async fn owners(&self) -> Vec<String> {
        let mut owners: Vec<String> = self.inner.lock().await.keys().cloned().collect();
        owners.sort();
        owners
    }

    /// Discard continuations idle longer than `idle`. Returns the count.
    pub async fn prune_idle(&self, idle: Duration) -> usize {
        let pruned: Vec<String> = {
            let mut table = self.inner.lock().await;
            let stale: Vec<String> = table
                .iter()
                .filter(|(_, entry)| entry.last_activity.elapsed() > idle)
                .map(|(user, _)| user.clone())
                .collect();
            for user in &stale {
                table.remove(user);
            }
            stale
        };

        for user in &pruned {
            self.close_row(user).await;
        }

        pruned.len()
    }

    async fn close_row(&self, user_id: &str) {
        if let Err(e) = session_store::close_session(self.db.pool(), user_id).await {
            warn!("Failed to close mirrored session for {}: {}", user_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn test_table() -> SessionTable {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        SessionTable::new(db)
    }

    fn continuation() -> Continuation {
        Continuation::new("gemini", json!({"contents": []}))
    }

    const FRESH: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn resume_removes_the_entry() {
        let table = test_table().await;
        table.put("+628111", continuation()).await;

        assert!(table.resume("+628111", FRESH).await.is_some());
        // Taken, not copied: a second resume finds nothing
        assert!(table.resume("+628111", FRESH).await.is_none());
    }

    #[tokio::test]
    async fn idle_entries_are_not_resumed() {
        let table = test_table().await;
        table.put("+628111", continuation()).await;

        assert!(table.resume("+628111", Duration::ZERO).await.is_none());
        assert_eq!(table.count().await, 0);
    }

    #[tokio::test]
    async fn discard_reports_existence() {
        let table = test_table().await;
        table.put("+628111", continuation()).await;

        assert!(table.discard("+628111").await);
        assert!(!table.discard("+628111").await);
    }

    #[tokio::test]
    async fn clear_all_empties_the_table() {
        let table = test_table().await;
        table.put("+628111", continuation()).await;
        table.put("+628222", continuation()).await;

        assert_eq!(table.clear_all().await, 2);
        assert_eq!(table.count().await, 0);
    }

    #[tokio::test]
    async fn owners_are_sorted() {
        let table = test_table().await;
        table.put("+628222", continuation()).await;
        table.put("+628111", continuation()).await;

        assert_eq!(table.owners().await, vec!["+628111", "+628222"]);
    }

    #[tokio::test]
    async fn prune_idle_drops_only_stale_entries() {
        let table = test_table().await;
        table.put("+628111", continuation()).await;

        assert_eq!(table.prune_idle(FRESH).await, 0);
        assert_eq!(table.prune_idle(Duration::ZERO).await, 1);
        assert_eq!(table.count().await, 0);
    }
}
