//! # fanout-measure
//!
//! Times publish-to-receive latency through the fanout dispatcher and prints
//! per-topic statistics.

mod cli;
mod config;
mod error;
mod run;
mod stats;

use anyhow::Result;
use clap::Parser;
use fanout_core::PubSub;
use std::sync::Arc;
use tracing::info;

use cli::Cli;
use config::MeasureConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let config = MeasureConfig::from(&cli).validate()?;
    info!(
        topics = config.topics,
        subscribers = config.subscribers,
        messages = config.messages,
        "fanout-measure starting"
    );

    let pubsub = Arc::new(PubSub::new());
    let (statistics, elapsed) = run::measure(pubsub, &config).await?;
    let report = statistics.report(elapsed);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }

    Ok(())
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        let default_level = match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
