//! Failing provider - always errors.

use async_trait::async_trait;
use provider_core::{GenerateLimits, ProviderError, StatelessProvider, Turn};

/// A stateless provider that fails every call.
///
/// Useful for testing fallback replies and error recovery.
#[derive(Debug, Clone, Default)]
pub struct FailingProvider {
    /// Optional API error message; defaults to a quota failure.
    message: Option<String>,
}

impl FailingProvider {
    /// Create a provider that fails with a generic quota error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that fails with a custom error message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

#[async_trait]
impl StatelessProvider for FailingProvider {
    async fn generate(
        &self,
        _system_prompt: &str,
        _history: &[Turn],
        _message: &str,
        _limits: &GenerateLimits,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Api {
            status: 429,
            message: self
                .message
                .clone()
                .unwrap_or_else(|| "quota exceeded".to_string()),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-1"
    }
}
