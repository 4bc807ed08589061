//! Transit engine HTTP server binary.
//!
//! Loads the configuration, builds the engine and its cache store, starts the
//! periodic cache sweeper and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! # In-memory cache (default)
//! cargo run --bin transit-server
//!
//! # File-backed cache
//! TRANSIT_STORE=file TRANSIT_STORE_PATH=/var/cache/transit cargo run --bin transit-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `TRANSIT_CONFIG`: Path to a `transit.toml` (default: search standard locations)
//! - `TRANSIT_STORE` / `TRANSIT_STORE_PATH`: Override the configured store
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use transit_engine::cache::ResultCache;
use transit_engine::http::{create_router, AppState};
use transit_engine::{EngineConfig, TransitEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting transit engine HTTP server");

    let config = EngineConfig::from_env()?;
    let engine = TransitEngine::from_config(&config).await?;
    info!(
        "Engine initialized (store: {}, namespace: {})",
        config.store.kind, config.store.namespace
    );

    if config.cache.sweep_interval_secs > 0 {
        spawn_sweeper(
            engine.cache().clone(),
            Duration::from_secs(config.cache.sweep_interval_secs),
        );
    }

    let app = create_router(AppState::new(engine));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn spawn_sweeper(cache: ResultCache, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cache.sweep_expired().await;
            if removed > 0 {
                info!("Cache sweep removed {} expired entries", removed);
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
