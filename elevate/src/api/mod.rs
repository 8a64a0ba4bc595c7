//! HTTP surface for the aggregator.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/heights?coords=[{"lon":..,"lat":..}]` | Resolve a batch from a query parameter |
//! | `POST` | `/heights` | Resolve a batch from `{"coords": [...]}` |
//! | `GET`  | `/health` | Liveness probe |
//!
//! Every `/heights` response body is an [`ElevationReport`](crate::elevation::ElevationReport).
//! The HTTP status reflects [`ReportStatus`](crate::elevation::ReportStatus).

mod handlers;
mod router;
mod server;

pub use handlers::{parse_coordinates, status_for, HeightsQuery, HeightsRequest};
pub use router::{build_router, AppState};
pub use server::{serve, serve_listener, ServerError};
