//! Subscriber-side handle
//!
//! A [`Subscription`] owns the receiving half of a single-slot queue. The
//! dispatcher keeps the sending half, keyed by the subscription's id.

use crate::error::TryRecvError;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Capacity of every endpoint queue
pub(crate) const QUEUE_CAPACITY: usize = 1;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a subscription
///
/// Ids are unique for the lifetime of the process, so a handle from one
/// dispatcher never matches an endpoint of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registry side of a subscription
pub(crate) struct Endpoint<T> {
    pub(crate) id: SubscriptionId,
    pub(crate) tx: mpsc::Sender<T>,
}

/// A registered interest in one topic
///
/// Every payload published to the topic after the subscription was created is
/// delivered here. The handle is also the token needed to unsubscribe.
///
/// Dropping the handle does not unsubscribe: the endpoint stays registered,
/// keeps counting as a subscriber and is skipped with a warning on every
/// publish. Call [`PubSub::unsubscribe`](crate::PubSub::unsubscribe) first.
#[derive(Debug)]
pub struct Subscription<T> {
    id: SubscriptionId,
    topic: String,
    rx: mpsc::Receiver<T>,
}

impl<T> Subscription<T> {
    /// Create the handle and its registry endpoint
    pub(crate) fn open(topic: &str) -> (Self, Endpoint<T>) {
        let id = SubscriptionId::next();
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let subscription = Self {
            id,
            topic: topic.to_owned(),
            rx,
        };
        (subscription, Endpoint { id, tx })
    }

    /// Get the subscription id
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Get the topic this subscription was created for
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the next payload
    ///
    /// Returns `None` once the subscription has been unsubscribed and any
    /// payload still queued has been received.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Take the queued payload without waiting
    pub fn try_recv(&mut self) -> Result<T, TryRecvError> {
        self.rx.try_recv().map_err(Into::into)
    }

    /// Blocking variant of [`recv`](Self::recv) for use outside async code
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_recv(&mut self) -> Option<T> {
        self.rx.blocking_recv()
    }

    /// Whether the dispatcher has closed this subscription
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }
}
