//! Discovery Server - Main Entry Point
//!
//! Usage:
//!     discovery-server --port 9100 --data data/sample.json
//!     discovery-server --address 127.0.0.1:9100

use std::sync::Arc;

use clap::Parser;
use discovery_server::{logging, serve, AppState, Args, ServerConfig, ServerError};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let args = Args::parse();
    logging::init_with_filter(&args.log_level);

    info!("Initializing discovery server");
    info!("  Version: {}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_args(&args)?;
    let dataset = config.load_dataset().await?;
    let state = Arc::new(AppState::from_dataset(dataset, &config));

    info!(
        users = state.store.user_count(),
        fetch_concurrency = config.recommend.fetch_concurrency,
        "Stores ready"
    );

    serve(&config, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
