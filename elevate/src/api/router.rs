//! Router construction.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::aggregator::Aggregator;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self { aggregator }
    }
}

/// Builds the API router with request tracing.
pub fn build_router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route(
            "/heights",
            get(handlers::get_heights).post(handlers::post_heights),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(aggregator))
}
