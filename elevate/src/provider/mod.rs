//! Terrain tile provider abstraction
//!
//! The core resolves elevations through the narrow [`TileFetcher`] contract:
//! given a tile address, return the raw raster bytes or an error. The
//! [`TerrariumProvider`] implements it over HTTP against a templated tile
//! store URL.
//!
//! ```ignore
//! use std::sync::Arc;
//! use elevate::provider::{AsyncReqwestClient, TerrariumProvider, TileFetcher};
//!
//! let client = AsyncReqwestClient::new()?;
//! let fetcher: Arc<dyn TileFetcher> = Arc::new(TerrariumProvider::new(client));
//! ```

mod http;
mod terrarium;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use terrarium::{TerrariumProvider, TERRARIUM_BASE_URL, TERRARIUM_EXTENSION};
pub use types::{BoxFuture, ProviderError, TileFetcher};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
