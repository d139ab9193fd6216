// 6.0: settlement notifications. the engine publishes one notice per settled
// trade; a dedicated consumer task applies reward updates asynchronously.
// the bus is a bounded mpsc channel: publish is fire-and-forget and the single
// ordered consumer preserves per-user FIFO without any partitioning.

use crate::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

// Emitted exactly once per successfully settled trade, delivered at least
// once to the reward updater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSettledNotice {
    pub user_id: UserId,
    pub settled_at: Timestamp,
}

impl TradeSettledNotice {
    pub fn new(user_id: UserId, settled_at: Timestamp) -> Self {
        Self {
            user_id,
            settled_at,
        }
    }
}

pub type NotificationReceiver = mpsc::Receiver<TradeSettledNotice>;

#[derive(Debug, Clone)]
pub struct NotificationSender {
    tx: mpsc::Sender<TradeSettledNotice>,
}

impl NotificationSender {
    // Settlement never fails because the consumer is gone; a closed channel
    // just means rewards stop accruing, which we log and move on from.
    pub async fn publish(&self, notice: TradeSettledNotice) {
        if let Err(err) = self.tx.send(notice).await {
            warn!(user = %err.0.user_id, "notification bus closed, reward update dropped");
        }
    }
}

pub fn notification_channel(capacity: usize) -> (NotificationSender, NotificationReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (NotificationSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_in_order() {
        let (sender, mut rx) = notification_channel(8);

        for ms in [1, 2, 3] {
            sender
                .publish(TradeSettledNotice::new(
                    UserId::new("u-1"),
                    Timestamp::from_millis(ms),
                ))
                .await;
        }

        for expected in [1, 2, 3] {
            let notice = rx.recv().await.unwrap();
            assert_eq!(notice.settled_at.as_millis(), expected);
        }
    }

    #[tokio::test]
    async fn publish_to_closed_channel_does_not_panic() {
        let (sender, rx) = notification_channel(1);
        drop(rx);

        sender
            .publish(TradeSettledNotice::new(
                UserId::new("u-1"),
                Timestamp::from_millis(0),
            ))
            .await;
    }
}
