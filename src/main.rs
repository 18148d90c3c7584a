//! Earn Now - an interval timer and reward counter
//!
//! This is the main entry point for the earn-now server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use earn_now::{
    api::create_router,
    config::Config,
    engine::{Clock, SystemClock},
    persistence::{JsonFileStore, KeyValueStore, MemoryStore},
    state::AppState,
    tasks::projection_ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("earn_now={},tower_http=info", config.log_level()))
        .init();

    info!("Starting earn-now server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_ms);

    let store: Arc<dyn KeyValueStore> = if config.ephemeral {
        info!("Ephemeral mode, state will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        let file_store = JsonFileStore::open_or_empty(&config.state_file);
        info!("Persisting state to {}", file_store.path().display());
        Arc::new(file_store)
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), clock, store));

    // Start the projection ticker background task
    let ticker_state = Arc::clone(&state);
    let tick = config.tick_interval();
    let ticker = tokio::spawn(async move {
        projection_ticker_task(ticker_state, tick).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST  /start  - Start accruing cycles");
    info!("  POST  /stop   - Pause and bank elapsed time");
    info!("  POST  /reset  - Discard all progress");
    info!("  GET   /config - Current configuration");
    info!("  PATCH /config - Update cycle length, reward or goal");
    info!("  GET   /status - Current projection and server status");
    info!("  GET   /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to install signal handler: {}", e),
            }
        }
    }

    ticker.abort();
    info!("Server shutdown complete");
    Ok(())
}
