//! # fanout-core
//!
//! In-process publish/subscribe dispatcher with 1:N fan-out, grouped by topic.
//!
//! This crate provides:
//! - Exact-match topics made of `[A-Za-z0-9._]`
//! - Any number of independent subscriptions per topic, each backed by a
//!   single-slot queue
//! - Publish that waits for every subscriber to make room (no drops)
//!
//! Wildcard subscriptions (`*`, `>`) are reserved and not supported.
//!
//! ```no_run
//! # async fn demo() -> fanout_core::Result<()> {
//! let pubsub = fanout_core::PubSub::new();
//! let mut sub = pubsub.subscribe("orders.created").await?;
//! pubsub.publish("orders.created", 42u32).await?;
//! assert_eq!(sub.recv().await, Some(42));
//! pubsub.unsubscribe("orders.created", &sub).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod pubsub;
pub mod stream;
pub mod subscription;
pub mod topic;

pub use error::{Error, Result, TryRecvError};
pub use pubsub::PubSub;
pub use stream::{Publisher, Stream, Subscriber};
pub use subscription::{Subscription, SubscriptionId};
pub use topic::validate_topic;
