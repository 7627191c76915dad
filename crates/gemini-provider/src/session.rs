//! Chat session state carried inside the continuation handle.

use provider_core::{Continuation, ProviderError, Role, Turn};
use serde::{Deserialize, Serialize};

use crate::api_types::Content;

/// The serializable state of one Gemini chat session.
///
/// This is what lives behind the opaque [`Continuation`] handle: the
/// system prompt fixed at open time plus the accumulated chat contents.
/// History is replayed once when the session is opened; afterwards each
/// send appends one user entry and one model entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// System prompt the session was opened with.
    pub system_prompt: String,
    /// Accumulated chat contents, oldest first.
    pub contents: Vec<Content>,
}

impl ChatSession {
    /// Seed a session from the system prompt and persisted history.
    pub fn seed(system_prompt: &str, history: &[Turn]) -> Self {
        let contents = history
            .iter()
            .map(|turn| match turn.role {
                Role::User => Content::user(turn.content.clone()),
                Role::Assistant => Content::model(turn.content.clone()),
            })
            .collect();

        Self {
            system_prompt: system_prompt.to_string(),
            contents,
        }
    }

    /// Number of chat entries accumulated so far.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Whether the session holds no entries yet.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Pack the session into an opaque continuation owned by `provider`.
    pub fn into_continuation(self, provider: &str) -> Result<Continuation, ProviderError> {
        let state = serde_json::to_value(&self).map_err(|e| {
            ProviderError::InvalidContinuation(format!("failed to serialize session: {}", e))
        })?;
        Ok(Continuation::new(provider, state))
    }

    /// Unpack a session from a continuation, verifying ownership.
    pub fn from_continuation(
        continuation: &Continuation,
        provider: &str,
    ) -> Result<Self, ProviderError> {
        if !continuation.belongs_to(provider) {
            return Err(ProviderError::InvalidContinuation(format!(
                "handle belongs to provider '{}'",
                continuation.provider
            )));
        }

        serde_json::from_value(continuation.state.clone()).map_err(|e| {
            ProviderError::InvalidContinuation(format!("corrupt session state: {}", e))
        })
    }
}
