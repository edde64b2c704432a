//! Crossline Gateway - HTTP/WebSocket gateway for escalation continuity.
//!
//! This is the main entry point for the gateway service. It wires the
//! RocksDB connection registry and the contact-center HTTP client into the
//! routers, serves the customer-facing API, and sweeps expired connection
//! records in the background.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crossline_contact::HttpContactCenter;
use crossline_gateway::{create_router, GatewayConfig, GatewayState};
use crossline_registry::{Registry, RocksRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crossline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Crossline Gateway");

    // Load configuration from environment
    let listen_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/crossline".into());
    let contact_center_url =
        std::env::var("CONTACT_CENTER_URL").unwrap_or_else(|_| "http://localhost:9090".into());
    let default_queue = std::env::var("DEFAULT_QUEUE").unwrap_or_else(|_| "default".into());

    tracing::info!(
        listen_addr = %listen_addr,
        data_dir = %data_dir,
        contact_center_url = %contact_center_url,
        default_queue = %default_queue,
        "Gateway configuration loaded"
    );

    // Initialize RocksDB registry
    tracing::info!(path = %data_dir, "Opening RocksDB registry");
    let registry = Arc::new(RocksRegistry::open(&data_dir)?);

    // Initialize contact-center client
    let client = Arc::new(HttpContactCenter::new(contact_center_url));

    // Build gateway state and configuration
    let config = GatewayConfig {
        listen_addr: listen_addr.clone(),
        default_queue,
        ..GatewayConfig::default()
    };
    let sweep_interval = config.sweep_interval();
    let state = GatewayState::new(client, Arc::clone(&registry), config);

    // Reap connection records abandoned without a clean disconnect
    tokio::spawn(sweep_expired_records(registry, sweep_interval));

    // Create the full router with all API endpoints
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically remove connection records whose TTL has passed.
async fn sweep_expired_records<R: Registry>(registry: Arc<R>, interval: std::time::Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        match registry.sweep_expired(chrono::Utc::now()) {
            Ok(0) => {}
            Ok(count) => tracing::info!(count, "Swept expired connection records"),
            Err(e) => tracing::warn!(error = %e, "Expired-record sweep failed"),
        }
    }
}
