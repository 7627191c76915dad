//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user in the system, identified by their transport contact handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Contact handle (e.g., "+6281234567890")
    pub id: String,
    /// Display name
    pub name: String,
    /// Preferred language code (e.g., "id", "en"); None until set or detected
    pub language: Option<String>,
    /// Number of from-user messages persisted for this user
    pub message_count: i64,
    /// Creation timestamp
    pub created_at: String,
    /// Last inbound-message timestamp
    pub last_seen: String,
}

/// One entry of the append-only message history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Auto-incrementing ID; conversation order within a user.
    pub id: i64,
    /// Owning user.
    pub user_id: String,
    /// Message content.
    pub content: String,
    /// true for from-user, false for from-system.
    pub from_user: bool,
    /// Message type tag (currently always "text").
    pub kind: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A persisted continuation session row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Owning user; at most one session per user.
    pub user_id: String,
    /// Provider that owns the continuation handle.
    pub provider: String,
    /// JSON-serialized opaque backend handle; cleared on close.
    pub handle: Option<String>,
    /// Whether the session is open.
    pub open: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last activity timestamp.
    pub last_activity: String,
}

/// Process-wide aggregate counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Analytics {
    /// Total users ever created.
    pub total_users: i64,
    /// Total messages ever persisted (both directions).
    pub total_messages: i64,
}

/// Per-day counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DayStats {
    /// Day stamp (YYYY-MM-DD).
    pub day: String,
    /// Messages persisted that day.
    pub messages: i64,
    /// Distinct users that sent a message that day.
    pub unique_users: i64,
}
