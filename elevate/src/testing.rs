//! Test doubles shared by unit tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use image::{ImageFormat, Rgb, RgbImage};

use crate::coord::{TileAddress, TILE_SIZE};
use crate::decode::terrarium_rgb;
use crate::provider::{BoxFuture, ProviderError, TileFetcher};

/// Encodes a terrain tile whose every pixel carries `height`.
pub fn uniform_tile(height: f64) -> Vec<u8> {
    let image = RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgb(terrarium_rgb(height)));
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode test tile");
    buf.into_inner()
}

#[derive(Debug, Clone)]
enum StubKind {
    Payload(Vec<u8>),
    Error(String),
    Stall,
}

/// Scripted behavior for one tile.
#[derive(Debug, Clone)]
pub struct Stub {
    kind: StubKind,
    delay: Option<Duration>,
}

impl Stub {
    pub fn height(height: f64) -> Self {
        Self::payload(uniform_tile(height))
    }

    pub fn payload(bytes: Vec<u8>) -> Self {
        Self {
            kind: StubKind::Payload(bytes),
            delay: None,
        }
    }

    pub fn fetch_error(message: &str) -> Self {
        Self {
            kind: StubKind::Error(message.to_string()),
            delay: None,
        }
    }

    /// Never completes.
    pub fn stall() -> Self {
        Self {
            kind: StubKind::Stall,
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Default)]
struct Counters {
    calls: AtomicUsize,
    completed: AtomicUsize,
    abandoned: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Tracks one fetch; counts it as abandoned if dropped before finishing.
struct InFlight<'a> {
    counters: &'a Counters,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn start(counters: &'a Counters) -> Self {
        counters.calls.fetch_add(1, Ordering::SeqCst);
        let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        counters.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self {
            counters,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
        self.counters.completed.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        if !self.finished {
            self.counters.abandoned.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Tile fetcher with per-tile scripted responses and call accounting.
pub struct StubFetcher {
    default: Stub,
    tiles: HashMap<TileAddress, Stub>,
    counters: Counters,
}

impl StubFetcher {
    pub fn new(default: Stub) -> Self {
        Self {
            default,
            tiles: HashMap::new(),
            counters: Counters::default(),
        }
    }

    pub fn with_tile(mut self, tile: TileAddress, stub: Stub) -> Self {
        self.tiles.insert(tile, stub);
        self
    }

    pub fn calls(&self) -> usize {
        self.counters.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.counters.completed.load(Ordering::SeqCst)
    }

    pub fn abandoned(&self) -> usize {
        self.counters.abandoned.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.counters.max_in_flight.load(Ordering::SeqCst)
    }
}

impl TileFetcher for StubFetcher {
    fn fetch(&self, tile: TileAddress) -> BoxFuture<'_, Result<Vec<u8>, ProviderError>> {
        let stub = self.tiles.get(&tile).unwrap_or(&self.default).clone();
        Box::pin(async move {
            let in_flight = InFlight::start(&self.counters);

            if let Some(delay) = stub.delay {
                tokio::time::sleep(delay).await;
            }

            let result = match stub.kind {
                StubKind::Payload(bytes) => Ok(bytes),
                StubKind::Error(message) => Err(ProviderError::HttpError(message)),
                StubKind::Stall => std::future::pending().await,
            };
            in_flight.finish();
            result
        })
    }

    fn name(&self) -> &str {
        "Stub"
    }
}
