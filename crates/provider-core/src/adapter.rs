//! The adapter traits and the active-provider variant.

use std::sync::Arc;

use async_trait::async_trait;

use crate::continuation::Continuation;
use crate::error::ProviderError;
use crate::types::{GenerateLimits, Turn};

/// A provider that rebuilds the full prompt on every call.
///
/// Simplest contract: system prompt + ordered history + new message in,
/// completion text out. No server-side state to manage, at the cost of
/// resending history each turn. Object-safe for `Arc<dyn StatelessProvider>`.
#[async_trait]
pub trait StatelessProvider: Send + Sync {
    /// Produce a completion for `message` given the prompt context.
    async fn generate(
        &self,
        system_prompt: &str,
        history: &[Turn],
        message: &str,
        limits: &GenerateLimits,
    ) -> Result<String, ProviderError>;

    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Model identifier this adapter is configured for.
    fn model(&self) -> &str;
}

/// A provider that keeps a conversational continuation per user.
///
/// `open` is called once per user: it seeds the continuation with the
/// system prompt and replays persisted history. After that, each turn
/// sends only the new message. On any error the caller must discard the
/// handle so the next turn rebuilds it from persisted history.
#[async_trait]
pub trait StatefulProvider: Send + Sync {
    /// Open a fresh continuation seeded with prior history.
    async fn open(
        &self,
        system_prompt: &str,
        history: &[Turn],
    ) -> Result<Continuation, ProviderError>;

    /// Send one new message through an open continuation.
    async fn send(
        &self,
        continuation: &mut Continuation,
        message: &str,
        limits: &GenerateLimits,
    ) -> Result<String, ProviderError>;

    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Model identifier this adapter is configured for.
    fn model(&self) -> &str;
}

/// The active provider, selected once at configuration time.
///
/// Adding a backend means implementing one of the two traits and wiring
/// it here, rather than extending a string switch at every call site.
#[derive(Clone)]
pub enum Adapter {
    /// A stateless-completion backend.
    Stateless(Arc<dyn StatelessProvider>),
    /// A stateful-continuation backend.
    Stateful(Arc<dyn StatefulProvider>),
}

impl Adapter {
    /// Provider name of the active backend.
    pub fn name(&self) -> &str {
        match self {
            Adapter::Stateless(p) => p.name(),
            Adapter::Stateful(p) => p.name(),
        }
    }

    /// Model identifier of the active backend.
    pub fn model(&self) -> &str {
        match self {
            Adapter::Stateless(p) => p.model(),
            Adapter::Stateful(p) => p.model(),
        }
    }

    /// Whether the active backend holds per-user continuations.
    pub fn is_stateful(&self) -> bool {
        matches!(self, Adapter::Stateful(_))
    }
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Adapter::Stateless(p) => write!(f, "Adapter::Stateless({})", p.name()),
            Adapter::Stateful(p) => write!(f, "Adapter::Stateful({})", p.name()),
        }
    }
}
