//! Scripted provider - plays back queued replies.

use std::collections::VecDeque;

use async_trait::async_trait;
use provider_core::{GenerateLimits, ProviderError, StatelessProvider, Turn};
use tokio::sync::Mutex;

/// A stateless provider that returns pre-scripted replies in order.
///
/// When the script runs out it fails, which makes exhausted scripts
/// visible in tests instead of silently echoing.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedProvider {
    /// Create a provider from an ordered list of replies.
    pub fn new(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
        }
    }

    /// Number of replies left in the script.
    pub async fn remaining(&self) -> usize {
        self.replies.lock().await.len()
    }
}

#[async_trait]
impl StatelessProvider for ScriptedProvider {
    async fn generate(
        &self,
        _system_prompt: &str,
        _history: &[Turn],
        _message: &str,
        _limits: &GenerateLimits,
    ) -> Result<String, ProviderError> {
        self.replies
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| ProviderError::InvalidResponse("script exhausted".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }
}
