//! Latency aggregation

use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// One delivery: the time between publish and receive on a topic
#[derive(Debug, Clone)]
pub struct Sample {
    pub topic: Arc<str>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    count: usize,
    total: Duration,
    min: Duration,
    max: Duration,
}

impl Accumulator {
    fn new(elapsed: Duration) -> Self {
        Self {
            count: 1,
            total: elapsed,
            min: elapsed,
            max: elapsed,
        }
    }

    fn add(&mut self, elapsed: Duration) {
        self.count += 1;
        self.total += elapsed;
        self.min = self.min.min(elapsed);
        self.max = self.max.max(elapsed);
    }

    fn merge(&mut self, other: &Accumulator) {
        self.count += other.count;
        self.total += other.total;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    fn summary(&self) -> Summary {
        Summary {
            messages: self.count,
            avg_us: micros(self.total) / self.count as f64,
            min_us: micros(self.min),
            max_us: micros(self.max),
        }
    }
}

fn micros(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000_000.0
}

/// Per-topic latency collector
#[derive(Debug, Default)]
pub struct Statistics {
    topics: BTreeMap<Arc<str>, Accumulator>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one delivery
    pub fn record(&mut self, sample: Sample) {
        self.topics
            .entry(sample.topic)
            .and_modify(|acc| acc.add(sample.elapsed))
            .or_insert_with(|| Accumulator::new(sample.elapsed));
    }

    /// Number of deliveries recorded so far
    pub fn len(&self) -> usize {
        self.topics.values().map(|acc| acc.count).sum()
    }

    /// Build the final report, topics in name order
    pub fn report(&self, elapsed: Duration) -> Report {
        let mut total: Option<Accumulator> = None;
        let topics = self
            .topics
            .iter()
            .map(|(topic, acc)| {
                match total.as_mut() {
                    Some(t) => t.merge(acc),
                    None => total = Some(*acc),
                }
                TopicReport {
                    topic: topic.to_string(),
                    summary: acc.summary(),
                }
            })
            .collect();

        Report {
            topics,
            total: total.map(|acc| acc.summary()),
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }
}

/// Aggregated latency figures, in microseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub messages: usize,
    pub avg_us: f64,
    pub min_us: f64,
    pub max_us: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicReport {
    pub topic: String,
    #[serde(flatten)]
    pub summary: Summary,
}

/// Result of a measurement run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub topics: Vec<TopicReport>,
    pub total: Option<Summary>,
    pub elapsed_ms: f64,
}

impl Report {
    /// Pretty-printed JSON rendering
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] : avg {:.1}µs min {:.1}µs max {:.1}µs",
            self.messages, self.avg_us, self.min_us, self.max_us
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for topic in &self.topics {
            writeln!(f, "{} {}", topic.topic, topic.summary)?;
        }
        if let Some(total) = &self.total {
            writeln!(f, "total {total}")?;
        }
        write!(f, "took {:.2}ms", self.elapsed_ms)
    }
}
