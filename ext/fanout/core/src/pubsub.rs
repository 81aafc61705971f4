//! Topic-based fan-out dispatcher
//!
//! One read/write lock guards the whole registry:
//! - `subscribe` and `unsubscribe` take it exclusively
//! - `publish` takes it shared and keeps it while delivering
//!
//! Delivery waits for room in each endpoint's single slot, so a subscriber
//! that stops receiving stalls every publisher of its topic. Since the shared
//! lock is held meanwhile, subscribe/unsubscribe on any topic stall too.

use crate::subscription::{Endpoint, Subscription};
use crate::topic::validate_topic;
use crate::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

/// In-process publish/subscribe dispatcher
///
/// Each instance owns an independent registry; there is no shared global one.
pub struct PubSub<T> {
    subscriptions: RwLock<HashMap<String, Vec<Endpoint<T>>>>,
}

impl<T> Default for PubSub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PubSub<T> {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
        }
    }

    /// Register interest in a topic
    ///
    /// Every subscription receives its own copy of each later publish.
    pub async fn subscribe(&self, topic: &str) -> Result<Subscription<T>> {
        validate_topic(topic)?;

        let mut subscriptions = self.subscriptions.write().await;

        let (subscription, endpoint) = Subscription::open(topic);
        let endpoints = subscriptions.entry(topic.to_owned()).or_default();
        endpoints.push(endpoint);

        debug!(
            topic,
            id = %subscription.id(),
            subscribers = endpoints.len(),
            "subscribed"
        );

        Ok(subscription)
    }

    /// Remove a subscription and close its queue
    ///
    /// The handle can still receive a payload that was queued before the
    /// call; after that `recv` returns `None`.
    pub async fn unsubscribe(&self, topic: &str, subscription: &Subscription<T>) -> Result<()> {
        let mut subscriptions = self.subscriptions.write().await;

        let endpoints = subscriptions
            .get_mut(topic)
            .ok_or_else(|| Error::TopicNotFound(topic.to_owned()))?;

        let id = subscription.id();
        let pos = endpoints
            .iter()
            .position(|endpoint| endpoint.id == id)
            .ok_or_else(|| Error::SubscriptionNotFound {
                topic: topic.to_owned(),
                id,
            })?;

        // dropping the sender closes the queue
        drop(endpoints.remove(pos));
        let remaining = endpoints.len();
        if remaining == 0 {
            subscriptions.remove(topic);
        }

        debug!(topic, id = %id, subscribers = remaining, "unsubscribed");
        Ok(())
    }

    /// Number of topics with at least one subscriber
    pub async fn topic_count(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    /// Number of subscribers currently registered for a topic
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.subscriptions
            .read()
            .await
            .get(topic)
            .map_or(0, Vec::len)
    }

    /// Check if anyone is subscribed to a topic
    pub async fn has_subscribers(&self, topic: &str) -> bool {
        self.subscriptions.read().await.contains_key(topic)
    }
}

impl<T: Clone + Send> PubSub<T> {
    /// Deliver a payload to every subscriber of a topic
    ///
    /// Subscribers are served in subscription order. The call waits, with no
    /// timeout, whenever a subscriber still holds an unreceived payload.
    /// Publishing to a topic nobody subscribes to is an error.
    pub async fn publish(&self, topic: &str, payload: T) -> Result<()> {
        validate_topic(topic)?;

        let subscriptions = self.subscriptions.read().await;

        let endpoints = subscriptions
            .get(topic)
            .ok_or_else(|| Error::TopicNotFound(topic.to_owned()))?;

        trace!(topic, subscribers = endpoints.len(), "publishing");

        for endpoint in endpoints {
            if endpoint.tx.send(payload.clone()).await.is_err() {
                warn!(
                    topic,
                    id = %endpoint.id,
                    "subscription handle dropped without unsubscribe, skipping"
                );
            }
        }

        Ok(())
    }
}
