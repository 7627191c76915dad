//! Delayed provider - wraps another provider with artificial delay.

use std::time::Duration;

use async_trait::async_trait;
use provider_core::{GenerateLimits, ProviderError, StatelessProvider, Turn};
use tokio::time::sleep;

/// A provider that wraps another provider and adds artificial delay.
///
/// Useful for testing timeout handling and simulating backend latency.
pub struct DelayedProvider<P: StatelessProvider> {
    inner: P,
    delay: Duration,
}

impl<P: StatelessProvider> DelayedProvider<P> {
    /// Create a new DelayedProvider wrapping the given provider.
    pub fn new(inner: P, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a provider with a delay in milliseconds.
    pub fn with_millis(inner: P, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<P: StatelessProvider> StatelessProvider for DelayedProvider<P> {
    async fn generate(
        &self,
        system_prompt: &str,
        history: &[Turn],
        message: &str,
        limits: &GenerateLimits,
    ) -> Result<String, ProviderError> {
        sleep(self.delay).await;
        self.inner.generate(system_prompt, history, message, limits).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
