//! Anthropic messages-API adapter.
//!
//! Implements [`provider_core::StatelessProvider`] over `/v1/messages`.
//! Like the OpenAI adapter, the full prompt is rebuilt each call; the
//! system prompt travels as a top-level field rather than a message.

mod api_types;
mod config;
mod provider;

pub use config::{AnthropicConfig, AnthropicConfigBuilder};
pub use provider::AnthropicProvider;
