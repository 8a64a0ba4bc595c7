//! Resolution of a single coordinate: project, fetch, decode.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::coord::{project, tile_origin, Coordinate};
use crate::decode::decode_height;
use crate::elevation::{ElevationSample, ErrorCode, ErrorDescriptor};
use crate::provider::TileFetcher;

/// Lifecycle of one coordinate resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPhase {
    Pending,
    Fetching,
    Decoding,
    Resolved,
    Failed,
}

impl fmt::Display for ResolutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionPhase::Pending => "pending",
            ResolutionPhase::Fetching => "fetching",
            ResolutionPhase::Decoding => "decoding",
            ResolutionPhase::Resolved => "resolved",
            ResolutionPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result message sent from a resolution task to the collector.
#[derive(Debug)]
pub(crate) struct TaskOutcome {
    /// Index of the coordinate in the batch's unique list.
    pub index: usize,
    pub sample: ElevationSample,
}

/// Everything one spawned resolution needs; owned so it can be `'static`.
pub(crate) struct ResolutionTask {
    pub index: usize,
    pub coordinate: Coordinate,
    pub zoom: u8,
    pub fetcher: Arc<dyn TileFetcher>,
    pub limiter: Option<Arc<Semaphore>>,
    pub cancellation: CancellationToken,
    pub results: mpsc::Sender<TaskOutcome>,
}

impl ResolutionTask {
    /// Runs the resolution and reports exactly one outcome, unless the
    /// request is cancelled first, in which case nothing is sent.
    pub(crate) async fn run(self) {
        let ResolutionTask {
            index,
            coordinate,
            zoom,
            fetcher,
            limiter,
            cancellation,
            results,
        } = self;

        let sample = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!(%coordinate, "Resolution cancelled");
                return;
            }
            sample = resolve_coordinate(fetcher.as_ref(), coordinate, zoom, limiter.as_deref()) => sample,
        };

        // The collector is gone once the request expired; the late result
        // is dropped.
        if results.send(TaskOutcome { index, sample }).await.is_err() {
            debug!(%coordinate, "Discarding result of expired request");
        }
    }
}

/// Projects, fetches and decodes one coordinate into a sample.
///
/// Never fails: fetch and decode errors become the sample's error.
pub async fn resolve_coordinate(
    fetcher: &dyn TileFetcher,
    coordinate: Coordinate,
    zoom: u8,
    limiter: Option<&Semaphore>,
) -> ElevationSample {
    let mut phase = ResolutionPhase::Pending;

    let _permit = match limiter {
        Some(semaphore) => match semaphore.acquire().await {
            Ok(permit) => Some(permit),
            Err(_) => {
                return failed(
                    &mut phase,
                    coordinate,
                    ErrorCode::FetchFailed,
                    "fetch limiter closed",
                )
            }
        },
        None => None,
    };

    let (tile, offset) = project(&coordinate, zoom);
    debug!(
        %coordinate,
        %tile,
        origin = %tile_origin(&tile),
        pixel_x = offset.x,
        pixel_y = offset.y,
        "Projected coordinate"
    );

    transition(&mut phase, ResolutionPhase::Fetching, coordinate);
    let raster = match fetcher.fetch(tile).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(%coordinate, %tile, provider = fetcher.name(), error = %e, "Tile fetch failed");
            return failed(&mut phase, coordinate, ErrorCode::FetchFailed, e.to_string());
        }
    };

    transition(&mut phase, ResolutionPhase::Decoding, coordinate);
    match decode_height(&raster, offset) {
        Ok(height) => {
            transition(&mut phase, ResolutionPhase::Resolved, coordinate);
            debug!(
                lat = coordinate.lat,
                lon = coordinate.lon,
                zoom,
                height,
                "Height calculated"
            );
            ElevationSample::resolved(coordinate, height)
        }
        Err(e) => {
            warn!(%coordinate, %tile, bytes = raster.len(), error = %e, "Tile decode failed");
            failed(&mut phase, coordinate, ErrorCode::DecodeFailed, e.to_string())
        }
    }
}

fn transition(phase: &mut ResolutionPhase, next: ResolutionPhase, coordinate: Coordinate) {
    debug!(%coordinate, from = %phase, to = %next, "Resolution phase");
    *phase = next;
}

fn failed(
    phase: &mut ResolutionPhase,
    coordinate: Coordinate,
    code: ErrorCode,
    description: impl Into<String>,
) -> ElevationSample {
    transition(phase, ResolutionPhase::Failed, coordinate);
    ElevationSample::failed(coordinate, ErrorDescriptor::new(code, description))
}
