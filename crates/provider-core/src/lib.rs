//! Core traits and types for AI provider adapters.
//!
//! This crate provides the shared interface every AI backend is accessed
//! through in the Kabar bot ecosystem. It defines:
//!
//! - [`StatelessProvider`] - adapters that rebuild the full prompt each call
//! - [`StatefulProvider`] - adapters that hold a continuation per user
//! - [`Adapter`] - the active-provider variant selected at configuration time
//! - [`Turn`] / [`GenerateLimits`] - request types shared by all adapters
//! - [`Continuation`] - the serializable opaque handle for stateful backends
//! - [`ProviderError`] - error types for adapter operations
//!
//! # Example
//!
//! ```rust
//! use provider_core::{
//!     async_trait, GenerateLimits, ProviderError, StatelessProvider, Turn,
//! };
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl StatelessProvider for MyProvider {
//!     async fn generate(
//!         &self,
//!         _system_prompt: &str,
//!         _history: &[Turn],
//!         message: &str,
//!         _limits: &GenerateLimits,
//!     ) -> Result<String, ProviderError> {
//!         Ok(format!("You said: {message}"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyProvider"
//!     }
//!
//!     fn model(&self) -> &str {
//!         "my-model-1"
//!     }
//! }
//! ```

mod adapter;
mod continuation;
mod error;
mod types;

pub use adapter::{Adapter, StatefulProvider, StatelessProvider};
pub use continuation::Continuation;
pub use error::ProviderError;
pub use types::{GenerateLimits, Role, Turn};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
