mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::{
    load_config, validate_config, CatalogCache, HttpFeedSource, Refresher, SnapshotStore,
};

use api::create_router;
use state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MARQUEE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Snapshot path: {:?}", config.snapshot.path);
    info!("Feed endpoint: {}", config.feed.base_url);

    // Open the snapshot and build the catalog cache from it. A missing file
    // is created empty; a corrupt one must stop us here.
    let store =
        SnapshotStore::open(&config.snapshot.path).context("Failed to open snapshot file")?;
    let cache = Arc::new(
        CatalogCache::from_snapshot(store).context("Failed to load snapshot into the cache")?,
    );
    info!(
        entries = cache.len(),
        last_updated = cache.last_updated(),
        "Catalog cache initialized"
    );

    // One shutdown channel for the background refresher.
    let (shutdown_tx, _) = broadcast::channel(1);

    // Spawn the refresher if enabled
    let refresher_handle = if config.refresher.enabled {
        let feed = Arc::new(
            HttpFeedSource::new(&config.feed).context("Failed to create feed client")?,
        );
        let refresher = Refresher::new(Arc::clone(&cache), feed, &config.feed);
        info!("Refresher started");
        Some(tokio::spawn(refresher.run(shutdown_tx.subscribe())))
    } else {
        info!("Refresher disabled in config");
        None
    };

    // Create app state and router
    let app_state = Arc::new(AppState::new(config.clone(), Arc::clone(&cache)));
    let app = create_router(app_state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop the refresher; readers are gone, nothing left to serve.
    info!("Server shutting down...");
    let _ = shutdown_tx.send(());
    if let Some(mut handle) = refresher_handle {
        if tokio::time::timeout(Duration::from_secs(5), &mut handle)
            .await
            .is_err()
        {
            warn!("Refresher did not stop within 5s, aborting it");
            handle.abort();
        }
        info!("Refresher stopped");
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
