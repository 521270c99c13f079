//! LeanIX Agent - CLI Entry Point
//!
//! Runs one agent task against the LeanIX catalog and prints the answer.

use leanix_agent::{agent::Agent, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Demo task used when no task is given on the command line.
const DEFAULT_TASK: &str = "Search for FactSheets with 'SAP' in the displayName, \
show the top 10, then fetch details for the first 2 IDs.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leanix_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing credentials are fatal here, before any
    // loop iteration begins.
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: host={} model={}",
        config.lx_host, config.model
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let task = if args.is_empty() {
        DEFAULT_TASK.to_string()
    } else {
        args.join(" ")
    };

    let agent = Agent::new(&config)?;
    let (outcome, log) = agent.run_task(&task).await?;

    info!("Run finished after {} transcript entries", log.len());
    match outcome.text() {
        Some(text) => println!("{}", text),
        None => println!("(no answer produced)"),
    }

    Ok(())
}
