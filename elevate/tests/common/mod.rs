//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{ImageFormat, Rgb, RgbImage};

use elevate::aggregator::{Aggregator, AggregatorConfig};
use elevate::coord::{project, Coordinate, TILE_SIZE};
use elevate::decode::terrarium_rgb;
use elevate::provider::{AsyncHttpClient, ProviderError, TerrariumProvider};

pub const BASE_URL: &str = "http://tiles.test/terrarium";

pub const FUJI: Coordinate = Coordinate::new(35.360638, 138.72905);
pub const EVEREST: Coordinate = Coordinate::new(27.986065, 86.922623);
pub const BENCHMARK: Coordinate = Coordinate::new(41.74774375, -71.31694444);

/// Encodes a tile whose every pixel carries `height`.
pub fn uniform_tile(height: f64) -> Vec<u8> {
    let image = RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgb(terrarium_rgb(height)));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// In-memory tile store keyed by URL. Unknown URLs answer like a 404.
///
/// Clones share the tile map and the request counter.
#[derive(Clone, Default)]
pub struct FakeTileStore {
    tiles: Arc<HashMap<String, Vec<u8>>>,
    requests: Arc<AtomicUsize>,
}

impl FakeTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves a uniform tile of `height` for the tile covering `coord`.
    pub fn with_height(mut self, coord: Coordinate, zoom: u8, height: f64) -> Self {
        let (tile, _) = project(&coord, zoom);
        let url = format!("{}/{}/{}/{}.png", BASE_URL, tile.zoom, tile.x, tile.y);
        Arc::make_mut(&mut self.tiles).insert(url, uniform_tile(height));
        self
    }

    pub fn with_raw(mut self, coord: Coordinate, zoom: u8, bytes: Vec<u8>) -> Self {
        let (tile, _) = project(&coord, zoom);
        let url = format!("{}/{}/{}/{}.png", BASE_URL, tile.zoom, tile.x, tile.y);
        Arc::make_mut(&mut self.tiles).insert(url, bytes);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl AsyncHttpClient for FakeTileStore {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.tiles
            .get(url)
            .cloned()
            .ok_or_else(|| ProviderError::HttpError(format!("HTTP 404 Not Found for {}", url)))
    }
}

/// Builds an aggregator over `store` through the real terrarium provider.
pub fn aggregator_over(store: FakeTileStore, config: AggregatorConfig) -> Aggregator {
    let provider = TerrariumProvider::with_base_url(store, BASE_URL, "png");
    Aggregator::new(Arc::new(provider), config)
}
