//! CLI argument definitions using clap.

use clap::Parser;

/// Measure publish-to-receive latency of the fanout dispatcher
#[derive(Parser, Debug)]
#[command(name = "fanout-measure", version, about)]
pub struct Cli {
    /// Number of topics to subscribe
    #[arg(long, default_value_t = 1)]
    pub topics: usize,

    /// Subscriptions for every topic
    #[arg(long, visible_alias = "goro", default_value_t = 1)]
    pub subscribers: usize,

    /// Messages published on every topic
    #[arg(long, default_value_t = 1)]
    pub msgs: usize,

    /// Length of the randomly generated topic names
    #[arg(long, default_value_t = 16)]
    pub topic_len: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, env = "FANOUT_MEASURE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all logging except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
