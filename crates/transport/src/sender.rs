//! Message sender trait and test implementations.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::TransportError;

/// Trait for sending outbound text through the transport connector.
///
/// Abstracted so the orchestrator and broadcaster work against any
/// connector (or a test double). `send` returns whether the transport
/// accepted the message; delivery is not guaranteed beyond that.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message.
    ///
    /// # Arguments
    /// * `recipient` - Contact handle of the recipient
    /// * `text` - Message content
    async fn send(&self, recipient: &str, text: &str) -> Result<bool, TransportError>;
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send(&self, recipient: &str, _text: &str) -> Result<bool, TransportError> {
        info!("Discarding message to {}", recipient);
        Ok(true)
    }
}

/// A message sender that records every send for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    /// Create an empty recording sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(recipient, text)` pairs sent so far, in order.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }

    /// Number of sends so far.
    pub async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, recipient: &str, text: &str) -> Result<bool, TransportError> {
        self.sent
            .lock()
            .await
            .push((recipient.to_string(), text.to_string()));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_sender_accepts() {
        let sender = NoOpSender;
        assert!(sender.send("+628111", "test").await.unwrap());
    }

    #[tokio::test]
    async fn recording_sender_keeps_order() {
        let sender = RecordingSender::new();
        sender.send("+628111", "first").await.unwrap();
        sender.send("+628222", "second").await.unwrap();

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], ("+628111".to_string(), "first".to_string()));
        assert_eq!(sent[1].1, "second");
    }
}
