//! Elevate - batch elevation lookups from terrarium tiles
//!
//! Given a batch of WGS84 coordinates, the library projects each one onto the
//! Web Mercator tile grid, fetches the covering terrarium-encoded PNG tile,
//! and decodes the height in meters from the pixel's RGB channels.
//!
//! Lookups run concurrently. Duplicate coordinates share one fetch, results
//! come back in input order, and the whole batch is bounded by a deadline.
//!
//! ```no_run
//! use std::sync::Arc;
//! use elevate::aggregator::{Aggregator, AggregatorConfig};
//! use elevate::coord::Coordinate;
//! use elevate::provider::{AsyncReqwestClient, TerrariumProvider};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = TerrariumProvider::new(AsyncReqwestClient::new()?);
//! let aggregator = Aggregator::new(Arc::new(provider), AggregatorConfig::default());
//!
//! let report = aggregator
//!     .resolve(&[Coordinate::new(35.3606, 138.7274)])
//!     .await;
//! println!("{:?}", report.items);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod api;
pub mod config;
pub mod coord;
pub mod decode;
pub mod elevation;
pub mod logging;
pub mod provider;

#[cfg(test)]
mod testing;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
