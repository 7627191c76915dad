//! The opaque continuation handle for stateful backends.

use serde::{Deserialize, Serialize};

/// A backend-held conversational context, serialized so it can survive in
/// the session store.
///
/// The orchestrator treats the handle as opaque: only the provider that
/// opened it may interpret `state`. At most one continuation exists per
/// user at a time; opening a new one invalidates the previous handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continuation {
    /// Name of the provider that owns this handle.
    pub provider: String,
    /// Provider-specific state. Corrupt or foreign state must surface as
    /// [`ProviderError::InvalidContinuation`](crate::ProviderError).
    pub state: serde_json::Value,
}

impl Continuation {
    /// Create a new continuation owned by `provider`.
    pub fn new(provider: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            provider: provider.into(),
            state,
        }
    }

    /// Check that this handle belongs to `provider`.
    pub fn belongs_to(&self, provider: &str) -> bool {
        self.provider == provider
    }
}
