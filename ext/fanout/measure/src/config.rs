//! Run parameters for a measurement

use crate::cli::Cli;
use crate::error::{MeasureError, Result};
use crate::run::LETTERS;

/// Shape of a measurement run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureConfig {
    /// Number of distinct topics (default: 1)
    pub topics: usize,

    /// Subscriptions per topic (default: 1)
    pub subscribers: usize,

    /// Messages published on every topic (default: 1)
    pub messages: usize,

    /// Length of the generated topic names (default: 16)
    pub topic_len: usize,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            topics: 1,
            subscribers: 1,
            messages: 1,
            topic_len: 16,
        }
    }
}

impl MeasureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set topic count
    pub fn topics(mut self, topics: usize) -> Self {
        self.topics = topics;
        self
    }

    /// Builder pattern: set subscriptions per topic
    pub fn subscribers(mut self, subscribers: usize) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builder pattern: set messages per topic
    pub fn messages(mut self, messages: usize) -> Self {
        self.messages = messages;
        self
    }

    /// Builder pattern: set generated topic name length
    pub fn topic_len(mut self, len: usize) -> Self {
        self.topic_len = len;
        self
    }

    /// Total publish calls for the run
    pub fn total_to_send(&self) -> usize {
        self.topics * self.messages
    }

    /// Total deliveries expected across every subscription
    pub fn total_to_receive(&self) -> usize {
        self.total_to_send() * self.subscribers
    }

    /// Reject shapes that cannot produce a measurement
    pub fn validate(self) -> Result<Self> {
        if self.topics == 0 || self.subscribers == 0 || self.messages == 0 {
            return Err(MeasureError::Config(
                "topics, subscribers and msgs must all be at least 1".into(),
            ));
        }
        if self.topic_len == 0 {
            return Err(MeasureError::Config("topic length must be at least 1".into()));
        }
        if let Some(available) = self.available_topics().filter(|&n| self.topics > n) {
            return Err(MeasureError::Config(format!(
                "{} topics requested but only {} distinct names of length {} exist",
                self.topics, available, self.topic_len
            )));
        }
        Ok(self)
    }

    /// Distinct letter-only names of `topic_len`, `None` when beyond `usize`
    fn available_topics(&self) -> Option<usize> {
        u32::try_from(self.topic_len)
            .ok()
            .and_then(|len| LETTERS.len().checked_pow(len))
    }
}

impl From<&Cli> for MeasureConfig {
    fn from(cli: &Cli) -> Self {
        Self::new()
            .topics(cli.topics)
            .subscribers(cli.subscribers)
            .messages(cli.msgs)
            .topic_len(cli.topic_len)
    }
}
