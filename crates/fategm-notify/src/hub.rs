//! Campaign-keyed subscriber registry with best-effort fan-out.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use dashmap::DashMap;
use futures::Stream;
use tokio::sync::mpsc;
use uuid::Uuid;

/// One event as seen by a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent<E> {
    /// Synthetic liveness handshake, delivered exactly once per
    /// subscription before any real event.
    Connected,
    /// A published event for the subscriber's campaign.
    Message(E),
}

type Senders<E> = HashMap<u64, mpsc::UnboundedSender<HubEvent<E>>>;

#[derive(Debug)]
struct Inner<E> {
    channels: DashMap<Uuid, Senders<E>>,
    next_id: AtomicU64,
}

/// Per-campaign fan-out of events to live subscribers.
///
/// The hub is an injectable value owned by top-level composition — cloning
/// it is cheap and every clone shares the same registry. `publish` never
/// blocks and never reports failure to its caller: delivery is best-effort
/// by design, and a subscriber whose channel is gone is unregistered on the
/// spot without affecting the others.
#[derive(Debug)]
pub struct NotificationHub<E> {
    inner: Arc<Inner<E>>,
}

impl<E> Clone for NotificationHub<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for NotificationHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> NotificationHub<E> {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                channels: DashMap::new(),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Registers a new subscriber for a campaign.
    ///
    /// A [`HubEvent::Connected`] event is queued before the handle is
    /// returned, so the caller can confirm liveness before the first real
    /// event. The returned [`Subscription`] unregisters itself when dropped;
    /// there is no server-side timeout.
    #[must_use]
    pub fn subscribe(&self, campaign_id: Uuid) -> Subscription<E> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        // The receiver is alive and unbounded; this cannot fail.
        let _ = tx.send(HubEvent::Connected);
        self.inner.channels.entry(campaign_id).or_default().insert(id, tx);

        tracing::debug!(%campaign_id, subscriber = id, "subscriber registered");
        Subscription {
            hub: self.clone(),
            campaign_id,
            id,
            rx,
        }
    }

    /// Number of live subscribers for a campaign.
    #[must_use]
    pub fn subscriber_count(&self, campaign_id: Uuid) -> usize {
        self.inner
            .channels
            .get(&campaign_id)
            .map_or(0, |senders| senders.len())
    }

    fn unregister(&self, campaign_id: Uuid, id: u64) {
        if let Some(mut senders) = self.inner.channels.get_mut(&campaign_id) {
            senders.remove(&id);
            let empty = senders.is_empty();
            drop(senders);
            if empty {
                self.inner
                    .channels
                    .remove_if(&campaign_id, |_, senders| senders.is_empty());
            }
        }
        tracing::debug!(%campaign_id, subscriber = id, "subscriber unregistered");
    }
}

impl<E: Clone> NotificationHub<E> {
    /// Delivers `event` to every current subscriber of `campaign_id`.
    ///
    /// Sends are unbounded and non-blocking. A failed send means the
    /// subscriber's receiver is gone; that subscriber is removed immediately
    /// and delivery to the rest continues. Events reach each subscriber in
    /// the order `publish` was called for its campaign.
    pub fn publish(&self, campaign_id: Uuid, event: &E) {
        let Some(mut senders) = self.inner.channels.get_mut(&campaign_id) else {
            return;
        };
        let before = senders.len();
        senders.retain(|_, tx| tx.send(HubEvent::Message(event.clone())).is_ok());
        let pruned = before - senders.len();
        let empty = senders.is_empty();
        drop(senders);

        if pruned > 0 {
            tracing::warn!(%campaign_id, pruned, "pruned unreachable subscribers during publish");
        }
        if empty {
            self.inner
                .channels
                .remove_if(&campaign_id, |_, senders| senders.is_empty());
        }
    }
}

/// A live subscription handle. Yields [`HubEvent`]s as a [`Stream`] and
/// unregisters itself from the hub on drop — client disconnect, graceful
/// completion, and transport errors all end up here.
#[derive(Debug)]
pub struct Subscription<E> {
    hub: NotificationHub<E>,
    campaign_id: Uuid,
    id: u64,
    rx: mpsc::UnboundedReceiver<HubEvent<E>>,
}

impl<E> Subscription<E> {
    /// The campaign this subscription watches.
    #[must_use]
    pub fn campaign_id(&self) -> Uuid {
        self.campaign_id
    }

    /// Receives the next event, or `None` once the hub side is gone.
    pub async fn recv(&mut self) -> Option<HubEvent<E>> {
        self.rx.recv().await
    }
}

impl<E> Stream for Subscription<E> {
    type Item = HubEvent<E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        self.hub.unregister(self.campaign_id, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connected_event_arrives_before_first_message() {
        let hub = NotificationHub::new();
        let campaign_id = Uuid::new_v4();

        let mut sub = hub.subscribe(campaign_id);
        hub.publish(campaign_id, &"attack".to_owned());

        assert_eq!(sub.recv().await, Some(HubEvent::Connected));
        assert_eq!(sub.recv().await, Some(HubEvent::Message("attack".to_owned())));
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let hub = NotificationHub::new();
        let campaign_id = Uuid::new_v4();
        let mut sub = hub.subscribe(campaign_id);

        for content in ["first", "second", "third"] {
            hub.publish(campaign_id, &content.to_owned());
        }

        assert_eq!(sub.recv().await, Some(HubEvent::Connected));
        for expected in ["first", "second", "third"] {
            assert_eq!(sub.recv().await, Some(HubEvent::Message(expected.to_owned())));
        }
    }

    #[tokio::test]
    async fn test_subscriber_never_sees_events_from_before_connect() {
        let hub = NotificationHub::new();
        let campaign_id = Uuid::new_v4();

        hub.publish(campaign_id, &"early".to_owned());
        let mut sub = hub.subscribe(campaign_id);
        hub.publish(campaign_id, &"late".to_owned());

        assert_eq!(sub.recv().await, Some(HubEvent::Connected));
        assert_eq!(sub.recv().await, Some(HubEvent::Message("late".to_owned())));
    }

    #[tokio::test]
    async fn test_campaigns_are_isolated() {
        let hub = NotificationHub::new();
        let watched = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut sub = hub.subscribe(watched);

        hub.publish(other, &"elsewhere".to_owned());
        hub.publish(watched, &"here".to_owned());

        assert_eq!(sub.recv().await, Some(HubEvent::Connected));
        assert_eq!(sub.recv().await, Some(HubEvent::Message("here".to_owned())));
    }

    #[tokio::test]
    async fn test_dead_subscriber_is_pruned_without_affecting_others() {
        let hub = NotificationHub::new();
        let campaign_id = Uuid::new_v4();

        let mut dead = hub.subscribe(campaign_id);
        let mut alive = hub.subscribe(campaign_id);
        assert_eq!(hub.subscriber_count(campaign_id), 2);

        // Simulate a broken connection: receiving half closed, sender still
        // registered, so the failure surfaces inside publish.
        dead.rx.close();
        hub.publish(campaign_id, &"still delivered".to_owned());

        assert_eq!(alive.recv().await, Some(HubEvent::Connected));
        assert_eq!(
            alive.recv().await,
            Some(HubEvent::Message("still delivered".to_owned()))
        );
        assert_eq!(hub.subscriber_count(campaign_id), 1);
    }

    #[tokio::test]
    async fn test_drop_unregisters_and_empty_campaigns_are_removed() {
        let hub: NotificationHub<String> = NotificationHub::new();
        let campaign_id = Uuid::new_v4();

        let sub = hub.subscribe(campaign_id);
        assert_eq!(hub.subscriber_count(campaign_id), 1);

        drop(sub);
        assert_eq!(hub.subscriber_count(campaign_id), 0);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_a_no_op() {
        let hub: NotificationHub<String> = NotificationHub::new();
        hub.publish(Uuid::new_v4(), &"nobody listening".to_owned());
    }
}
