//! Terrarium terrain tile provider.
//!
//! Serves the global "terrarium" elevation tiles from the public AWS open
//! data bucket. Tiles are 256×256 PNGs whose pixels encode height in meters
//! (see [`crate::decode`]).
//!
//! # URL Pattern
//!
//! `https://s3.amazonaws.com/elevation-tiles-prod/terrarium/{z}/{x}/{y}.png`
//!
//! - Standard XYZ tile coordinates (x = column, y = row from the north)
//! - No authentication required

use crate::coord::{TileAddress, MAX_ZOOM};
use crate::provider::{AsyncHttpClient, BoxFuture, ProviderError, TileFetcher};

/// Base URL of the public terrarium tile set.
pub const TERRARIUM_BASE_URL: &str = "https://s3.amazonaws.com/elevation-tiles-prod/terrarium";

/// File extension of terrarium tiles.
pub const TERRARIUM_EXTENSION: &str = "png";

/// Terrain tile provider over a templated HTTP store.
///
/// # Example
///
/// ```ignore
/// use elevate::provider::{AsyncReqwestClient, TerrariumProvider};
///
/// let client = AsyncReqwestClient::new()?;
/// let provider = TerrariumProvider::new(client);
/// let bytes = provider.fetch(TileAddress::new(15, 8405, 12182)).await?;
/// ```
pub struct TerrariumProvider<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    extension: String,
}

impl<C: AsyncHttpClient> TerrariumProvider<C> {
    /// Creates a provider for the public terrarium tile set.
    pub fn new(http_client: C) -> Self {
        Self::with_base_url(http_client, TERRARIUM_BASE_URL, TERRARIUM_EXTENSION)
    }

    /// Creates a provider for a mirror of the tile set.
    ///
    /// A trailing slash on `base_url` and a leading dot on `extension` are
    /// tolerated.
    pub fn with_base_url(
        http_client: C,
        base_url: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let extension = extension.into().trim_start_matches('.').to_string();
        Self {
            http_client,
            base_url,
            extension,
        }
    }

    /// Builds the tile URL: `{base}/{z}/{x}/{y}.{ext}`
    fn build_url(&self, tile: &TileAddress) -> String {
        format!(
            "{}/{}/{}/{}.{}",
            self.base_url, tile.zoom, tile.x, tile.y, self.extension
        )
    }
}

impl<C: AsyncHttpClient> TileFetcher for TerrariumProvider<C> {
    fn fetch(&self, tile: TileAddress) -> BoxFuture<'_, Result<Vec<u8>, ProviderError>> {
        Box::pin(async move {
            if tile.zoom > MAX_ZOOM {
                return Err(ProviderError::UnsupportedZoom(tile.zoom));
            }
            if !tile.is_within_grid() {
                return Err(ProviderError::TileOutOfRange(tile.to_string()));
            }

            let url = self.build_url(&tile);
            tracing::trace!(%url, "Fetching terrain tile");
            self.http_client.get(&url).await
        })
    }

    fn name(&self) -> &str {
        "Terrarium"
    }
}
