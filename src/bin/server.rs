//! Bounty Bridge Web Server
//!
//! Runs the timer-driven poll loop alongside the HTTP front door.

use anyhow::{Context, Result};
use bounty_bridge::api::{create_app, AppState};
use bounty_bridge::Config;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Default to info for the bridge itself, warn for dependencies.
    // Override with RUST_LOG, e.g. RUST_LOG=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,bounty_bridge=info,bounty_bridge_server=info,tower_http=info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // Load configuration
    let config = Config::from_env();

    let tags = if config.filter_tags.is_empty() {
        "ANY".to_string()
    } else {
        config.filter_tags.join(",")
    };

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║       BOUNTY BRIDGE - WEB SERVER                             ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  Upstream: {:<49} ║", config.api_url);
    println!("║  Webhooks: {:<49} ║", config.webhook_urls.len());
    println!("║  Poll Interval: {:<44} ║", format!("{}s", config.poll_interval_seconds));
    println!("║  Filter Tags: {:<46} ║", tags);
    println!("║  Min Reward: {:<47} ║", config.min_reward);
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let port = config.port;
    let state = AppState::new(config);

    // Spawn background poller (first cycle runs immediately)
    let poller = state.poller.clone();
    tokio::spawn(async move {
        info!("Starting background poller...");
        poller.run().await;
    });

    // Create the Axum app
    let app = create_app(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);
    println!();
    println!("  Health:   http://localhost:{}/health", port);
    println!("  Poll:     POST http://localhost:{}/poll", port);
    println!("  Bounties: POST http://localhost:{}/bounties", port);
    println!();

    // Run the server
    axum::serve(listener, app).await?;

    Ok(())
}
