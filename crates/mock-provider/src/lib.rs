//! Mock provider implementations for testing message processing.
//!
//! These adapters exercise both sides of the provider contract without
//! any network:
//!
//! - [`EchoProvider`] - stateless, echoes the message back
//! - [`ScriptedProvider`] - stateless, plays back queued replies
//! - [`FailingProvider`] - stateless, always fails with a chosen error
//! - [`DelayedProvider`] - wraps a stateless provider with artificial delay
//! - [`SessionEchoProvider`] - stateful, tracks opens/sends in its handle

mod delayed;
mod echo;
mod failing;
mod scripted;
mod session_echo;

pub use delayed::DelayedProvider;
pub use echo::EchoProvider;
pub use failing::FailingProvider;
pub use scripted::ScriptedProvider;
pub use session_echo::SessionEchoProvider;
