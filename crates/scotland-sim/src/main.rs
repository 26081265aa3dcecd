//! Scotland Yard headless simulator.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod map;
mod observer;
mod sim;
mod summary;

use config::SimConfig;
use sim::SimState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SimConfig::from_env()?;
    info!(?config, "Starting Scotland Yard simulator...");

    let state = Arc::new(SimState::new());
    sim::run_simulation(config, Arc::clone(&state)).await?;

    for summary in state.summaries() {
        println!("{}", serde_json::to_string(&summary)?);
    }

    let tally = state.tally();
    info!(
        mr_x = tally.mr_x,
        detectives = tally.detectives,
        unfinished = tally.unfinished,
        failed = tally.failed,
        "Simulation complete"
    );

    Ok(())
}
