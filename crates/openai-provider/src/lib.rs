//! OpenAI chat-completions adapter.
//!
//! Implements [`provider_core::StatelessProvider`] over the
//! `/v1/chat/completions` endpoint. The full prompt (system + history +
//! new message) is rebuilt on every call; OpenAI holds no state for us.

mod api_types;
mod config;
mod provider;

pub use config::{OpenAiConfig, OpenAiConfigBuilder};
pub use provider::OpenAiProvider;
