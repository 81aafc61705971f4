//! Error types for fanout-core

use crate::subscription::SubscriptionId;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the dispatcher
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Topic is the empty string
    #[error("topic empty")]
    EmptyTopic,

    /// Topic contains a character outside `[A-Za-z0-9._]`
    #[error("topic contains illegal char [{0}]")]
    InvalidTopicCharacter(char),

    /// No subscriber is currently registered for the topic
    #[error("topic not subscribed: {0}")]
    TopicNotFound(String),

    /// The handle is not registered under the topic
    #[error("subscription {id} not found for topic {topic}")]
    SubscriptionNotFound { topic: String, id: SubscriptionId },
}

impl Error {
    /// True for the errors raised by topic validation
    pub fn is_invalid_topic(&self) -> bool {
        matches!(self, Error::EmptyTopic | Error::InvalidTopicCharacter(_))
    }
}

/// Error returned by [`Subscription::try_recv`](crate::Subscription::try_recv)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// Nothing queued right now
    #[error("no payload available")]
    Empty,

    /// The subscription was closed by unsubscribe and fully drained
    #[error("subscription closed")]
    Closed,
}

impl From<tokio::sync::mpsc::error::TryRecvError> for TryRecvError {
    fn from(err: tokio::sync::mpsc::error::TryRecvError) -> Self {
        match err {
            tokio::sync::mpsc::error::TryRecvError::Empty => TryRecvError::Empty,
            tokio::sync::mpsc::error::TryRecvError::Disconnected => TryRecvError::Closed,
        }
    }
}
