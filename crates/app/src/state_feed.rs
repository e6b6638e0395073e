//! In-process state feed backed by a tokio mpsc channel.
//!
//! The state-change source pushes notifications through a [`StateFeed`];
//! the publisher consumes the paired stream. A single consumer keeps
//! per-entity arrival order.

use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use discoverystream_domain::entity::StateSnapshot;

/// Notification stream consumed by the publisher. `None` marks an entity
/// whose state was removed.
pub type StateStream = UnboundedReceiverStream<Option<StateSnapshot>>;

/// Sending half of the state feed. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StateFeed {
    sender: mpsc::UnboundedSender<Option<StateSnapshot>>,
}

impl StateFeed {
    /// Create a feed and the stream that receives its notifications.
    #[must_use]
    pub fn channel() -> (Self, StateStream) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, UnboundedReceiverStream::new(receiver))
    }

    /// Push a notification. Returns `false` once the consumer is gone.
    pub fn push(&self, new_state: Option<StateSnapshot>) -> bool {
        self.sender.send(new_state).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    fn snapshot(state: &str) -> StateSnapshot {
        StateSnapshot::builder()
            .entity_id("sensor.power")
            .state(state)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_deliver_notifications_in_order() {
        let (feed, mut stream) = StateFeed::channel();

        assert!(feed.push(Some(snapshot("1"))));
        assert!(feed.push(None));
        assert!(feed.push(Some(snapshot("2"))));

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.state.as_deref(), Some("1"));
        assert!(stream.next().await.unwrap().is_none());
        let third = stream.next().await.unwrap().unwrap();
        assert_eq!(third.state.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn should_end_stream_when_every_feed_is_dropped() {
        let (feed, mut stream) = StateFeed::channel();
        let clone = feed.clone();
        drop(feed);
        clone.push(Some(snapshot("1")));
        drop(clone);

        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn should_report_closed_consumer() {
        let (feed, stream) = StateFeed::channel();
        drop(stream);
        assert!(!feed.push(Some(snapshot("1"))));
    }
}
