//! Broadcast utilities for Kabar.
//!
//! This crate fans one text message out to many recipients over a
//! [`transport::MessageSender`], with a fixed delay between sends so the
//! transport's rate limits are respected. The pacing is cooperative,
//! not backpressure: the delay is applied between recipients regardless
//! of the transport's state.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use broadcaster::Broadcaster;
//! use transport::NoOpSender;
//!
//! # async fn example() {
//! let sender = Arc::new(NoOpSender);
//! let broadcaster = Broadcaster::new(sender, Duration::from_millis(1100));
//!
//! let recipients = vec!["+628111".to_string(), "+628222".to_string()];
//! let report = broadcaster.broadcast(&recipients, "Maintenance at 10pm").await;
//! assert_eq!(report.sent, 2);
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};
use transport::MessageSender;

/// Outcome of one broadcast run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    /// Recipients the transport accepted the message for.
    pub sent: usize,
    /// Recipients where the send failed or was rejected.
    pub failed: usize,
}

/// A broadcaster that paces sends to many recipients.
pub struct Broadcaster<S: MessageSender> {
    sender: Arc<S>,
    delay: Duration,
}

impl<S: MessageSender> Broadcaster<S> {
    /// Create a broadcaster over `sender` with a fixed inter-send delay.
    pub fn new(sender: Arc<S>, delay: Duration) -> Self {
        Self { sender, delay }
    }

    /// The configured inter-send delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Send `text` to every recipient, pausing between sends.
    ///
    /// Individual failures are logged and counted; they never abort the
    /// run. The delay is applied between consecutive sends, not after
    /// the last one.
    pub async fn broadcast(&self, recipients: &[String], text: &str) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        info!("Broadcasting to {} recipients", recipients.len());

        for (i, recipient) in recipients.iter().enumerate() {
            if i > 0 {
                sleep(self.delay).await;
            }

            match self.sender.send(recipient, text).await {
                Ok(true) => report.sent += 1,
                Ok(false) => {
                    warn!("Transport rejected broadcast to {}", recipient);
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("Broadcast to {} failed: {}", recipient, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Broadcast complete: {} sent, {} failed",
            report.sent, report.failed
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use transport::RecordingSender;

    #[tokio::test]
    async fn sends_to_every_recipient_in_order() {
        let sender = Arc::new(RecordingSender::new());
        let broadcaster = Broadcaster::new(sender.clone(), Duration::from_millis(0));

        let recipients = vec![
            "+628111".to_string(),
            "+628222".to_string(),
            "+628333".to_string(),
        ];
        let report = broadcaster.broadcast(&recipients, "ping").await;

        assert_eq!(report.sent, 3);
        assert_eq!(report.failed, 0);

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].0, "+628111");
        assert_eq!(sent[2].0, "+628333");
    }

    #[tokio::test]
    async fn paces_between_sends() {
        let sender = Arc::new(RecordingSender::new());
        let broadcaster = Broadcaster::new(sender, Duration::from_millis(30));

        let recipients = vec![
            "+628111".to_string(),
            "+628222".to_string(),
            "+628333".to_string(),
        ];

        let start = Instant::now();
        broadcaster.broadcast(&recipients, "ping").await;

        // Two gaps between three sends
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn empty_recipient_list_is_a_noop() {
        let sender = Arc::new(RecordingSender::new());
        let broadcaster = Broadcaster::new(sender.clone(), Duration::from_millis(10));

        let report = broadcaster.broadcast(&[], "ping").await;

        assert_eq!(report.sent, 0);
        assert_eq!(sender.count().await, 0);
    }
}
