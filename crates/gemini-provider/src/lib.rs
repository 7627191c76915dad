//! Gemini stateful chat-session adapter.
//!
//! Implements [`provider_core::StatefulProvider`]: `open` seeds a chat
//! session with the system prompt and replays persisted history once;
//! each subsequent `send` carries only the new message, with the session
//! contents accumulated inside the opaque continuation handle. A handle
//! that errors must be discarded by the caller so the next turn reopens
//! from persisted history.

mod api_types;
mod config;
mod provider;
mod session;

pub use config::{GeminiConfig, GeminiConfigBuilder};
pub use provider::GeminiProvider;
pub use session::ChatSession;
