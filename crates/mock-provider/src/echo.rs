//! Echo provider - echoes messages back.

use async_trait::async_trait;
use provider_core::{GenerateLimits, ProviderError, StatelessProvider, Turn};

/// A simple stateless provider that echoes messages back.
///
/// Useful for testing the turn flow without any AI processing.
#[derive(Debug, Clone, Default)]
pub struct EchoProvider {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoProvider {
    /// Create a new EchoProvider with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoProvider with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_provider::EchoProvider;
    ///
    /// let provider = EchoProvider::with_prefix("Echo: ");
    /// // Will respond with "Echo: <original message>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl StatelessProvider for EchoProvider {
    async fn generate(
        &self,
        _system_prompt: &str,
        _history: &[Turn],
        message: &str,
        _limits: &GenerateLimits,
    ) -> Result<String, ProviderError> {
        Ok(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, message),
            None => message.to_string(),
        })
    }

    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo-1"
    }
}
