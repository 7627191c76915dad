//! Chat-transport contract.
//!
//! The actual connector (WhatsApp, Telegram, a console harness) lives
//! outside this workspace; this crate pins down the narrow interface it
//! implements and consumes: [`MessageSender`] for outbound text,
//! [`InboundText`] for delivered messages, and [`Connectivity`] for the
//! link-state signal. [`NoOpSender`] and [`RecordingSender`] ship here so
//! the orchestrator is testable without a real connector.

mod sender;

pub use sender::{MessageSender, NoOpSender, RecordingSender};

use thiserror::Error;

/// Errors that can occur while talking to the transport connector.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connector is not connected to its backend.
    #[error("transport disconnected")]
    Disconnected,

    /// The send was attempted but failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Connectivity state reported by the transport connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Link is up; sends are expected to succeed.
    Connected,
    /// Link is down; sends will fail.
    Disconnected,
    /// Link dropped and the connector is re-establishing it.
    Reconnecting,
}

/// One inbound text-bearing event, as delivered by the connector.
///
/// The connector is responsible for ignoring non-text content apart from
/// extracting captions; by the time a message reaches the orchestrator it
/// is plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundText {
    /// Opaque contact handle of the sender (phone-like string).
    pub sender: String,
    /// Message text (or extracted caption).
    pub text: String,
    /// Delivery timestamp (Unix millis).
    pub timestamp: i64,
}

impl InboundText {
    /// Create an inbound text event.
    pub fn new(sender: impl Into<String>, text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_text_construction() {
        let inbound = InboundText::new("+628111", "Halo", 1700000000000);
        assert_eq!(inbound.sender, "+628111");
        assert_eq!(inbound.text, "Halo");
    }
}
