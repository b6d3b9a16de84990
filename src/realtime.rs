// Insert-event fan-out. The backing platform delivers row-insert events
// over a subscribe/callback channel; in-process that channel is a broadcast
// bus. Consumers receive a thin event and perform a secondary fetch to
// materialize the full joined record before rendering - the event itself
// never carries row data.

use tokio::sync::broadcast;

use crate::core::{GroupId, MessageId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealtimeEvent {
    /// A message row was inserted into a group's log.
    MessageInserted {
        group_id: GroupId,
        message_id: MessageId,
    },
    /// A pending follow edge targeting `target_id` was inserted.
    FollowRequested {
        target_id: UserId,
        follower_id: UserId,
    },
}

pub struct RealtimeHub {
    tx: broadcast::Sender<RealtimeEvent>,
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        RealtimeHub { tx }
    }

    /// Publish never fails: with no live subscribers the event is dropped,
    /// matching fire-and-forget insert notifications.
    pub fn publish(&self, event: RealtimeEvent) {
        let _ = self.tx.send(event);
    }

    /// Subscription lifetime is the receiver's lifetime; callers filter the
    /// stream themselves (by group or target user). A lagged receiver skips
    /// missed events rather than erroring.
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_events_to_subscribers() {
        let hub = RealtimeHub::new(8);
        let mut rx = hub.subscribe();

        hub.publish(RealtimeEvent::MessageInserted {
            group_id: 1,
            message_id: 42,
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            RealtimeEvent::MessageInserted {
                group_id: 1,
                message_id: 42
            }
        );
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let hub = RealtimeHub::new(8);
        hub.publish(RealtimeEvent::FollowRequested {
            target_id: 1,
            follower_id: 2,
        });
    }
}
