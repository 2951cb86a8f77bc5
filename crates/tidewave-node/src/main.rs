//! Tidewave orchestrator binary.

use clap::Parser;
use tidewave_node::{init_tracing, run_server, AppState, Args};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let (addr, config) = Args::parse().load().await?;

    info!(
        "🔧 integrations: anthropic={} hooks={} health={} audit={}",
        config.llm.is_configured(),
        config.deploy.is_configured(),
        config.health.target(),
        config.audit.is_configured()
    );

    let state = AppState::from_config(config)?;
    run_server(addr, state).await
}
