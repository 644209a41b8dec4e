//! HTTP router and serve loop

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handlers;
use crate::logging::prefix;
use crate::state::AppState;

/// Build the HTTP router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", post(handlers::search))
        .route("/search/invalidate", post(handlers::invalidate))
        .route("/recommendations/:user_id", get(handlers::recommendations))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.addr).await?;
    info!(
        "{} Discovery server listening on {}",
        prefix::OPEN,
        listener.local_addr()?
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("{} Discovery server shutdown complete", prefix::CLOSE);
    Ok(())
}
