//! Measurement orchestration
//!
//! Subscribers are registered before any publish happens, so every publish
//! fans out to the full set.

use crate::config::MeasureConfig;
use crate::error::{MeasureError, Result};
use crate::stats::{Sample, Statistics};
use fanout_core::{Stream, Subscription};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Alphabet of generated topic names
pub const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Random letter-only topic name
pub fn random_topic(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

/// `count` distinct random topic names of `len` letters
///
/// The caller must ensure `count` fits the name space, see
/// [`MeasureConfig::validate`].
pub fn distinct_topics(count: usize, len: usize) -> Vec<Arc<str>> {
    let mut seen = HashSet::with_capacity(count);
    while seen.len() < count {
        seen.insert(random_topic(len));
    }
    seen.into_iter().map(Arc::from).collect()
}

/// Run one measurement against `stream` and collect per-topic latencies
pub async fn measure<S>(stream: Arc<S>, config: &MeasureConfig) -> Result<(Statistics, Duration)>
where
    S: Stream<Instant> + 'static,
{
    let started = Instant::now();
    let topics = distinct_topics(config.topics, config.topic_len);

    let (stat_tx, mut stat_rx) = mpsc::unbounded_channel();
    let mut consumers = JoinSet::new();

    info!(count = config.topics * config.subscribers, "Starting subscribers");
    for topic in &topics {
        for _ in 0..config.subscribers {
            let sub = stream.subscribe(topic).await?;
            consumers.spawn(consume(
                stream.clone(),
                topic.clone(),
                sub,
                config.messages,
                stat_tx.clone(),
            ));
        }
    }
    drop(stat_tx);

    info!(count = config.total_to_send(), "Publishing messages");
    let mut producers = JoinSet::new();
    for topic in &topics {
        for _ in 0..config.messages {
            let stream = stream.clone();
            let topic = topic.clone();
            producers.spawn(async move { stream.publish(&topic, Instant::now()).await });
        }
    }

    info!(count = config.total_to_receive(), "Collecting messages");
    let mut statistics = Statistics::new();
    let mut producers_done = false;
    while statistics.len() < config.total_to_receive() {
        tokio::select! {
            sample = stat_rx.recv() => match sample {
                Some(sample) => statistics.record(sample),
                // every consumer is gone; their results explain why
                None => break,
            },
            // a failed publish aborts the run, dropping the sets cancels the rest
            published = producers.join_next(), if !producers_done => match published {
                Some(published) => published??,
                None => producers_done = true,
            },
        }
    }

    while let Some(published) = producers.join_next().await {
        published??;
    }
    while let Some(consumed) = consumers.join_next().await {
        consumed??;
    }

    Ok((statistics, started.elapsed()))
}

async fn consume<S>(
    stream: Arc<S>,
    topic: Arc<str>,
    mut sub: Subscription<Instant>,
    expected: usize,
    stats: mpsc::UnboundedSender<Sample>,
) -> Result<()>
where
    S: Stream<Instant> + 'static,
{
    for received in 0..expected {
        let published_at = sub.recv().await.ok_or_else(|| MeasureError::SubscriberClosed {
            topic: topic.to_string(),
            received,
            expected,
        })?;
        // the collector may have stopped early after another task failed
        let _ = stats.send(Sample {
            topic: topic.clone(),
            elapsed: published_at.elapsed(),
        });
    }

    stream.unsubscribe(&topic, &sub).await?;
    debug!(topic = %topic, id = %sub.id(), "Subscriber finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fanout_core::{PubSub, Publisher, Subscriber};

    #[test]
    fn test_random_topic_is_valid() {
        let topic = random_topic(16);
        assert_eq!(topic.len(), 16);
        assert!(fanout_core::validate_topic(&topic).is_ok());
    }

    #[test]
    fn test_distinct_topics() {
        let topics = distinct_topics(52, 1);
        let unique: HashSet<_> = topics.iter().collect();
        assert_eq!(unique.len(), 52);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_measure_single_letter_topics() {
        let pubsub = Arc::new(PubSub::new());
        let config = MeasureConfig::new()
            .topics(52)
            .subscribers(2)
            .messages(3)
            .topic_len(1)
            .validate()
            .unwrap();

        let run = measure(pubsub.clone(), &config);
        let (statistics, _) = tokio::time::timeout(Duration::from_secs(10), run)
            .await
            .expect("measurement did not finish")
            .unwrap();
        assert_eq!(statistics.len(), 52 * 2 * 3);
        assert_eq!(pubsub.topic_count().await, 0);
    }

    /// Subscribes normally but refuses every publish
    struct RejectingPublisher(PubSub<Instant>);

    #[async_trait]
    impl Subscriber<Instant> for RejectingPublisher {
        async fn subscribe(&self, topic: &str) -> fanout_core::Result<Subscription<Instant>> {
            self.0.subscribe(topic).await
        }

        async fn unsubscribe(
            &self,
            topic: &str,
            subscription: &Subscription<Instant>,
        ) -> fanout_core::Result<()> {
            self.0.unsubscribe(topic, subscription).await
        }
    }

    #[async_trait]
    impl Publisher<Instant> for RejectingPublisher {
        async fn publish(&self, topic: &str, _payload: Instant) -> fanout_core::Result<()> {
            Err(fanout_core::Error::TopicNotFound(topic.to_owned()))
        }
    }

    #[tokio::test]
    async fn test_publish_failure_aborts_run() {
        let stream = Arc::new(RejectingPublisher(PubSub::new()));
        let config = MeasureConfig::new().topics(2).subscribers(2).messages(2);

        let result = tokio::time::timeout(Duration::from_secs(10), measure(stream, &config))
            .await
            .expect("measurement did not finish");
        assert!(matches!(
            result,
            Err(MeasureError::Dispatcher(fanout_core::Error::TopicNotFound(_)))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_measure_counts_every_delivery() {
        let pubsub = Arc::new(PubSub::new());
        let config = MeasureConfig::new().topics(3).subscribers(4).messages(5);

        let (statistics, _) = measure(pubsub.clone(), &config).await.unwrap();
        assert_eq!(statistics.len(), 60);

        let report = statistics.report(Duration::ZERO);
        assert_eq!(report.topics.len(), 3);
        for topic in &report.topics {
            assert_eq!(topic.summary.messages, 20);
        }

        // every subscriber unsubscribed at the end
        assert_eq!(pubsub.topic_count().await, 0);
    }
}
