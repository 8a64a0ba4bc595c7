//! Tile fetcher contract and errors.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::coord::TileAddress;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur while retrieving a tile.
///
/// The aggregator treats every variant as an opaque leaf failure for the
/// coordinate being resolved; it never interprets status codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Zoom level the tile store does not serve.
    #[error("Unsupported zoom level: {0}")]
    UnsupportedZoom(u8),

    /// Tile indices outside the grid at their zoom level.
    #[error("Tile {0} is outside the tile grid")]
    TileOutOfRange(String),

    /// Provider could not be constructed.
    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),
}

/// Source of raw terrain rasters.
///
/// Implementations must be `Send + Sync` so a single fetcher can be shared
/// by every resolution task of a request. Methods return boxed futures so
/// the trait stays usable as `Arc<dyn TileFetcher>`.
pub trait TileFetcher: Send + Sync {
    /// Retrieves the encoded raster for one tile.
    ///
    /// Dropping the returned future abandons the request.
    fn fetch(&self, tile: TileAddress) -> BoxFuture<'_, Result<Vec<u8>, ProviderError>>;

    /// Human-readable name used in logs.
    fn name(&self) -> &str;
}
