use tokio::sync::broadcast;
use tracing::debug;
use treffpunkt_common::event::ForumEvent;

/// Fan-out hub for committed mutations. Every connected client holds
/// one receiver; dropping it is the unsubscribe.
#[derive(Clone, Debug)]
pub struct Broadcaster {
    sender: broadcast::Sender<ForumEvent>,
}

impl Broadcaster {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// New subscriptions receive no backlog. A client fetches a
    /// snapshot through the read endpoints before trusting pushes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ForumEvent> {
        self.sender.subscribe()
    }

    /// Best-effort delivery to every current subscriber. Never blocks
    /// the writer; a subscriber that fell behind the channel capacity
    /// misses events and recovers via snapshot on its own.
    pub fn publish(&self, event: ForumEvent) {
        let name = event.name();
        let delivered = self.sender.send(event).unwrap_or(0);
        debug!(event = name, delivered, "Broadcast");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use tokio::sync::broadcast::error::TryRecvError;
    use treffpunkt_common::model::{Id, post::Post};

    fn post(id: &str) -> Post {
        Post {
            id: Id::new(id.to_owned()).unwrap(),
            author: "Alice".to_owned(),
            content: "hi".to_owned(),
            timestamp: datetime!(2026-01-02 03:04:05 UTC),
            likes: 0,
        }
    }

    #[tokio::test]
    async fn every_subscriber_observes_each_event_once() {
        let broadcaster = Broadcaster::new(16);
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        broadcaster.publish(ForumEvent::PostCreated(post("p1")));

        for receiver in [&mut first, &mut second] {
            let event = receiver.recv().await.unwrap();
            assert!(matches!(event, ForumEvent::PostCreated(post) if post.id.get() == "p1"));
            assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_fine() {
        let broadcaster = Broadcaster::new(16);
        broadcaster.publish(ForumEvent::PostCreated(post("p1")));
    }

    #[tokio::test]
    async fn dropped_subscriber_does_not_affect_others() {
        let broadcaster = Broadcaster::new(16);
        let mut kept = broadcaster.subscribe();
        let dropped = broadcaster.subscribe();
        drop(dropped);

        broadcaster.publish(ForumEvent::PostUpdated(post("p1")));

        assert!(kept.recv().await.is_ok());
    }

    #[tokio::test]
    async fn new_subscription_gets_no_backlog() {
        let broadcaster = Broadcaster::new(16);
        let mut warm = broadcaster.subscribe();
        broadcaster.publish(ForumEvent::PostCreated(post("p1")));

        let mut late = broadcaster.subscribe();

        assert!(warm.recv().await.is_ok());
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }
}
