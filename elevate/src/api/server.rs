//! Server lifecycle.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::router::build_router;
use crate::aggregator::Aggregator;
use crate::config::ServerSettings;

/// Errors raised while starting or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server failed while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Binds `settings.address` and serves until `shutdown` is cancelled.
pub async fn serve(
    settings: &ServerSettings,
    aggregator: Arc<Aggregator>,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(&settings.address)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {}: {}", settings.address, e)))?;

    serve_listener(listener, aggregator, shutdown).await
}

/// Serves on an already bound listener until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn serve_listener(
    listener: TcpListener,
    aggregator: Arc<Aggregator>,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(e.to_string()))?;

    info!(
        %addr,
        provider = aggregator.provider_name(),
        zoom = aggregator.config().zoom,
        deadline_ms = aggregator.config().deadline.as_millis() as u64,
        "Elevation API listening"
    );

    axum::serve(listener, build_router(aggregator))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    info!(%addr, "Elevation API stopped");
    Ok(())
}
