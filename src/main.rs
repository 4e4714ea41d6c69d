//! Repfinder - congressional representative lookup API server
//!
//! Maps US ZIP codes and postal addresses to congressional representatives
//! and surfaces campaign finance totals, voting record snippets, and
//! calendar/transcript links from third-party APIs.

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use repfinder::cli::{Cli, ServiceConfig};
use repfinder::refresh::{RefreshConfig, RefreshHandle};
use repfinder::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ServiceConfig::from_cli(cli);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("repfinder=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let state = Arc::new(AppState::from_config(&config)?);

    // Warm the roster and keep it fresh in the background
    let _refresh = RefreshHandle::spawn(
        state.clone(),
        RefreshConfig {
            roster_interval: std::time::Duration::from_secs(config.roster_ttl_secs),
            // Keep expired entries around long enough to serve stale across
            // several failed refresh cycles
            purge_grace: std::time::Duration::from_secs(config.roster_ttl_secs * 4),
            enabled: config.refresh_enabled,
            ..Default::default()
        },
    );

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting repfinder API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
