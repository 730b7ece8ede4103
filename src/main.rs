//! Edgenote application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Connect to Redis
//! 3. Build router with API routes + static file serving
//! 4. Apply security headers middleware
//! 5. Start Axum server

use edgenote::{auth::AppState, config::Config, routes, storage::RedisStore};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to load config");
        std::process::exit(1);
    });
    tracing::info!("Starting edgenote on {}", config.bind_addr);

    // Connect to Redis and verify it answers
    let store = RedisStore::connect(&config.redis_url)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to connect to Redis");
            std::process::exit(1);
        });

    let bind_addr = config.bind_addr;
    let state = AppState::new(Arc::new(store), config);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, addr = %bind_addr, "Failed to bind");
            std::process::exit(1);
        });
    tracing::info!("Listening on {}", bind_addr);

    // Start server (with_connect_info required for ConnectInfo<SocketAddr> extractors)
    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
