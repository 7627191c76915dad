//! Stateful echo provider - tracks opens and sends in its handle.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use provider_core::{
    Continuation, GenerateLimits, ProviderError, StatefulProvider, Turn,
};
use serde_json::json;

/// A stateful provider that echoes messages and records session shape.
///
/// The continuation state holds how many history entries were replayed at
/// open time (`seeded`) and how many messages have been sent since
/// (`sent`). Tests use these to verify that a discarded handle is rebuilt
/// from persisted history rather than reused.
#[derive(Debug, Default)]
pub struct SessionEchoProvider {
    opens: AtomicUsize,
    fail_next: AtomicBool,
}

impl SessionEchoProvider {
    /// Create a new SessionEchoProvider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of continuations opened so far.
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Make the next `send` fail with an API error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Entries replayed when the continuation was opened.
    pub fn seeded(continuation: &Continuation) -> usize {
        continuation.state["seeded"].as_u64().unwrap_or(0) as usize
    }

    /// Messages sent through the continuation since it was opened.
    pub fn sent(continuation: &Continuation) -> usize {
        continuation.state["sent"].as_u64().unwrap_or(0) as usize
    }
}

#[async_trait]
impl StatefulProvider for SessionEchoProvider {
    async fn open(
        &self,
        _system_prompt: &str,
        history: &[Turn],
    ) -> Result<Continuation, ProviderError> {
        self.opens.fetch_add(1, Ordering::SeqCst);

        Ok(Continuation::new(
            self.name(),
            json!({ "seeded": history.len(), "sent": 0 }),
        ))
    }

    async fn send(
        &self,
        continuation: &mut Continuation,
        message: &str,
        _limits: &GenerateLimits,
    ) -> Result<String, ProviderError> {
        if !continuation.belongs_to(self.name()) {
            return Err(ProviderError::InvalidContinuation(format!(
                "handle belongs to provider '{}'",
                continuation.provider
            )));
        }

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ProviderError::Api {
                status: 500,
                message: "injected failure".to_string(),
            });
        }

        let sent = Self::sent(continuation) + 1;
        continuation.state["sent"] = json!(sent);

        Ok(format!("session-echo: {}", message))
    }

    fn name(&self) -> &str {
        "session-echo"
    }

    fn model(&self) -> &str {
        "session-echo-1"
    }
}
