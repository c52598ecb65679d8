use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod aggregator;
mod config;
mod espn;
mod models;
mod server;

use aggregator::SportsAggregator;
use config::Config;
use espn::EspnClient;
use server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    info!(
        "Aggregating {} fixtures for team {} (league {})",
        config.competition_name, config.team_id, config.league_code
    );

    let espn = EspnClient::new(&config)?;
    let aggregator = Arc::new(SportsAggregator::new(Arc::new(espn), config.clone()));

    let state = AppState {
        aggregator,
        cache_fresh_secs: config.cache_fresh_secs,
    };
    let app = server::router(state);
    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .context("Invalid listen address")?;
    info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
