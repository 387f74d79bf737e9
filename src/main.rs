//! Round Bell - a state-managed HTTP server driving a boxing round timer
//!
//! This is the main entry point for the round-bell application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use round_bell::{
    api::create_router, config::Config, state::AppState, tasks::round_ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("round_bell={},tower_http=info", config.log_level()))
        .init();

    info!("Starting round-bell server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, rounds={}, round={}s, rest={}s",
        config.host, config.port, config.rounds, config.round_secs, config.rest_secs
    );

    // Reject an unusable timer configuration up front
    let timer_config = config.timer_config();
    if let Err(e) = timer_config.validate() {
        tracing::error!("Invalid timer configuration: {}", e);
        std::process::exit(1);
    }

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), timer_config));

    // Start the round ticker background task
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        round_ticker_task(ticker_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /configure - Replace the timer configuration");
    info!("  POST /start     - Begin the countdown at round 1");
    info!("  POST /pause     - Halt the countdown, keeping remaining time");
    info!("  POST /resume    - Continue a paused countdown");
    info!("  POST /reset     - Return the timer to idle");
    info!("  GET  /status    - Live timer readout");
    info!("  GET  /health    - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
