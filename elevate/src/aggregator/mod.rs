//! Batch elevation resolution.
//!
//! The [`Aggregator`] turns an ordered list of coordinates into an
//! [`ElevationReport`]:
//!
//! ```text
//! coords ──► dedup ──► one task per unique coordinate ──► mpsc ──► collector
//!                      (project → fetch → decode)                   │
//!                                                     deadline ─────┤
//!                                                                   ▼
//!                                             reassemble in input order
//! ```
//!
//! Tasks never write shared state; each sends its sample over a channel
//! that only the collector reads. The collector races the channel against
//! the deadline. When the deadline wins, the report carries `TimerExpired`
//! and lists only the positions whose coordinate had resolved, in input
//! order. In-flight tasks are then cancelled through the request's
//! [`CancellationToken`] unless [`AggregatorConfig::cancel_on_expiry`] is
//! turned off, in which case they run to completion and their results are
//! discarded.

mod batch;
mod task;

pub use task::{resolve_coordinate, ResolutionPhase};

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::coord::{Coordinate, DEFAULT_ZOOM};
use crate::elevation::{ElevationReport, ElevationSample, ErrorCode, ErrorDescriptor};
use crate::provider::TileFetcher;

use batch::Batch;
use task::{ResolutionTask, TaskOutcome};

/// Default time budget for one batch.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Configuration for the [`Aggregator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Zoom level used to project coordinates onto tiles.
    pub zoom: u8,

    /// Time budget for a whole batch.
    pub deadline: Duration,

    /// Maximum number of concurrent tile lookups across all requests.
    ///
    /// `None` runs one task per unique coordinate with no cap.
    pub max_concurrency: Option<usize>,

    /// Whether in-flight lookups are cancelled when the deadline expires.
    pub cancel_on_expiry: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            deadline: DEFAULT_DEADLINE,
            max_concurrency: None,
            cancel_on_expiry: true,
        }
    }
}

impl AggregatorConfig {
    /// Set the projection zoom level.
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the batch deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Cap concurrent lookups. `0` is treated as no cap.
    pub fn with_max_concurrency(mut self, max: Option<usize>) -> Self {
        self.max_concurrency = max.filter(|&n| n > 0);
        self
    }

    /// Choose whether expiry cancels in-flight lookups.
    pub fn with_cancel_on_expiry(mut self, cancel: bool) -> Self {
        self.cancel_on_expiry = cancel;
        self
    }
}

/// How the collector stopped waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Complete,
    Expired,
    Cancelled,
    /// Every task is gone but some never reported (a task panicked).
    Abandoned,
}

/// Resolves batches of coordinates against a tile fetcher.
///
/// Cheap to share: wrap in an `Arc` and call [`Aggregator::resolve`] from
/// any number of requests.
pub struct Aggregator {
    fetcher: Arc<dyn TileFetcher>,
    config: AggregatorConfig,
    limiter: Option<Arc<Semaphore>>,
}

impl Aggregator {
    /// Creates an aggregator over the given fetcher.
    pub fn new(fetcher: Arc<dyn TileFetcher>, config: AggregatorConfig) -> Self {
        let limiter = config
            .max_concurrency
            .map(|permits| Arc::new(Semaphore::new(permits)));
        Self {
            fetcher,
            config,
            limiter,
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Name of the underlying tile fetcher.
    pub fn provider_name(&self) -> &str {
        self.fetcher.name()
    }

    /// Resolves every coordinate and returns heights in input order.
    pub async fn resolve(&self, coords: &[Coordinate]) -> ElevationReport {
        self.resolve_with_cancellation(coords, &CancellationToken::new())
            .await
    }

    /// Like [`Aggregator::resolve`], stopping early when `cancellation` fires.
    ///
    /// Lookups observe a child of `cancellation`, so cancelling it also
    /// abandons in-flight fetches. Dropping the returned future does the same.
    /// An early stop is reported like an expired deadline.
    pub async fn resolve_with_cancellation(
        &self,
        coords: &[Coordinate],
        cancellation: &CancellationToken,
    ) -> ElevationReport {
        let batch = Batch::new(coords);
        if batch.is_empty() {
            return ElevationReport::default();
        }

        let started = Instant::now();
        let unique = batch.unique().len();
        info!(
            coordinates = batch.len(),
            unique,
            provider = self.fetcher.name(),
            "Resolving elevation batch"
        );

        let request_token = cancellation.child_token();
        let guard = request_token.clone().drop_guard();

        // Capacity covers every task, so sends never wait on the collector.
        let (tx, mut rx) = mpsc::channel(unique);
        for (index, coordinate) in batch.unique().iter().enumerate() {
            let task = ResolutionTask {
                index,
                coordinate: *coordinate,
                zoom: self.config.zoom,
                fetcher: Arc::clone(&self.fetcher),
                limiter: self.limiter.clone(),
                cancellation: request_token.clone(),
                results: tx.clone(),
            };
            tokio::spawn(task.run());
        }
        drop(tx);

        let mut results: Vec<Option<ElevationSample>> = vec![None; unique];
        let mut outstanding = unique;
        let mut report_error: Option<ErrorDescriptor> = None;

        let deadline = tokio::time::sleep(self.config.deadline);
        tokio::pin!(deadline);

        let collection = loop {
            if outstanding == 0 {
                break Collection::Complete;
            }

            tokio::select! {
                biased;
                _ = cancellation.cancelled() => break Collection::Cancelled,
                message = rx.recv() => match message {
                    Some(TaskOutcome { index, sample }) => {
                        if let Some(error) = &sample.error {
                            // Most recent per-item failure wins.
                            report_error = Some(ErrorDescriptor::new(
                                ErrorCode::SubrequestsFailed,
                                error.description.clone(),
                            ));
                        }
                        if results[index].replace(sample).is_none() {
                            outstanding -= 1;
                        }
                    }
                    None => break Collection::Abandoned,
                },
                _ = &mut deadline => break Collection::Expired,
            }
        };

        match collection {
            Collection::Complete => {}
            Collection::Expired => {
                report_error = Some(ErrorDescriptor::new(
                    ErrorCode::TimerExpired,
                    format!("{:?} deadline expired", self.config.deadline),
                ));
            }
            Collection::Cancelled => {
                report_error = Some(ErrorDescriptor::new(
                    ErrorCode::TimerExpired,
                    "request cancelled before all heights resolved",
                ));
            }
            Collection::Abandoned => {
                report_error = Some(ErrorDescriptor::new(
                    ErrorCode::SubrequestsFailed,
                    format!("{} lookups ended without a result", outstanding),
                ));
            }
        }

        if collection == Collection::Expired && !self.config.cancel_on_expiry {
            // Let orphaned lookups finish; their sends fail and are dropped.
            guard.disarm();
        } else {
            drop(guard);
        }

        let items = batch.reassemble(&results);
        let report = ElevationReport {
            items,
            error: report_error,
        };

        info!(
            status = ?report.status(),
            items = report.items.len(),
            outstanding,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Elevation batch finished"
        );
        if let Some(error) = &report.error {
            debug!(code = %error.code, description = %error.description, "Batch error");
        }

        report
    }
}
