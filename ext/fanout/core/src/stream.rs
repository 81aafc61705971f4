//! Capability traits for code that only needs one side of the dispatcher

use crate::{PubSub, Result, Subscription};
use async_trait::async_trait;

/// Registers and withdraws interest in topics
#[async_trait]
pub trait Subscriber<T: Send + 'static>: Send + Sync {
    /// Register interest in a topic
    async fn subscribe(&self, topic: &str) -> Result<Subscription<T>>;

    /// Withdraw a subscription, closing its queue
    async fn unsubscribe(&self, topic: &str, subscription: &Subscription<T>) -> Result<()>;
}

/// Sends payloads to every subscriber of a topic
#[async_trait]
pub trait Publisher<T: Send + 'static>: Send + Sync {
    /// Deliver a payload to all current subscribers of a topic
    async fn publish(&self, topic: &str, payload: T) -> Result<()>;
}

/// Both halves of a publish/subscribe dispatcher
pub trait Stream<T: Send + 'static>: Subscriber<T> + Publisher<T> {}

impl<T: Send + 'static, S: Subscriber<T> + Publisher<T>> Stream<T> for S {}

#[async_trait]
impl<T: Send + 'static> Subscriber<T> for PubSub<T> {
    async fn subscribe(&self, topic: &str) -> Result<Subscription<T>> {
        PubSub::subscribe(self, topic).await
    }

    async fn unsubscribe(&self, topic: &str, subscription: &Subscription<T>) -> Result<()> {
        PubSub::unsubscribe(self, topic, subscription).await
    }
}

#[async_trait]
impl<T: Clone + Send + 'static> Publisher<T> for PubSub<T> {
    async fn publish(&self, topic: &str, payload: T) -> Result<()> {
        PubSub::publish(self, topic, payload).await
    }
}
