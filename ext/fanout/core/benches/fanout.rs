use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fanout_core::PubSub;
use rand::Rng;
use tokio::runtime::Runtime;

const PAYLOAD_SIZE: usize = 64;
const TOPIC_LEN: usize = 16;

struct Plan {
    topics: usize,
    subscribers: usize,
    messages: usize,
}

fn random_string(len: usize) -> String {
    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

/// Subscribe every consumer, then publish from one task per topic and wait
/// until all deliveries were received.
async fn run_plan(plan: &Plan, payload: Arc<str>) -> usize {
    let pubsub = Arc::new(PubSub::<Arc<str>>::new());
    let topics: Vec<String> = (0..plan.topics).map(|_| random_string(TOPIC_LEN)).collect();

    let mut consumers = Vec::with_capacity(plan.topics * plan.subscribers);
    for topic in &topics {
        for _ in 0..plan.subscribers {
            let mut sub = pubsub.subscribe(topic).await.unwrap();
            let messages = plan.messages;
            consumers.push(tokio::spawn(async move {
                for _ in 0..messages {
                    black_box(sub.recv().await);
                }
                messages
            }));
        }
    }

    let mut producers = Vec::with_capacity(plan.topics);
    for topic in topics {
        let pubsub = pubsub.clone();
        let payload = payload.clone();
        let messages = plan.messages;
        producers.push(tokio::spawn(async move {
            for _ in 0..messages {
                pubsub.publish(&topic, payload.clone()).await.unwrap();
            }
        }));
    }

    for producer in producers {
        producer.await.unwrap();
    }
    let mut delivered = 0;
    for consumer in consumers {
        delivered += consumer.await.unwrap();
    }
    delivered
}

fn bench_fanout(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let payload: Arc<str> = random_string(PAYLOAD_SIZE).into();

    let plans = [
        Plan { topics: 1, subscribers: 10, messages: 10 },
        Plan { topics: 1, subscribers: 10, messages: 100 },
        Plan { topics: 1, subscribers: 10, messages: 1000 },
        Plan { topics: 10, subscribers: 10, messages: 10 },
        Plan { topics: 10, subscribers: 10, messages: 100 },
        Plan { topics: 10, subscribers: 100, messages: 10 },
        Plan { topics: 100, subscribers: 100, messages: 10 },
    ];

    let mut group = c.benchmark_group("fanout");
    group.sample_size(10);
    for plan in &plans {
        let id = format!(
            "topics{}_subs{}_msgs{}",
            plan.topics, plan.subscribers, plan.messages
        );
        group.bench_with_input(BenchmarkId::from_parameter(id), plan, |b, plan| {
            b.iter(|| {
                let delivered = rt.block_on(run_plan(plan, payload.clone()));
                assert_eq!(delivered, plan.topics * plan.subscribers * plan.messages);
            })
        });
    }
    group.finish();
}

fn bench_subscribe_unsubscribe(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let pubsub = PubSub::<u64>::new();

    c.bench_function("subscribe_unsubscribe", |b| {
        b.iter(|| {
            rt.block_on(async {
                let sub = pubsub.subscribe("bench.topic").await.unwrap();
                pubsub.unsubscribe("bench.topic", &sub).await.unwrap();
            })
        })
    });
}

criterion_group!(benches, bench_fanout, bench_subscribe_unsubscribe);
criterion_main!(benches);
