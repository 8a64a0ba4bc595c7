//! Integration tests for the lookup pipeline.
//!
//! These tests run the complete flow through the public API:
//! coordinate → projection → terrarium URL → PNG decode → ordered report,
//! with an in-memory tile store standing in for the network.
//!
//! Run with: `cargo test --test pipeline_integration`

mod common;

use std::time::Duration;

use elevate::aggregator::AggregatorConfig;
use elevate::coord::Coordinate;
use elevate::elevation::{ErrorCode, ReportStatus};

use common::{aggregator_over, FakeTileStore, BENCHMARK, EVEREST, FUJI};

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test]
async fn test_resolves_batch_in_input_order() {
    let store = FakeTileStore::new()
        .with_height(FUJI, 15, 3685.69921875)
        .with_height(EVEREST, 15, 8368.4140625);
    let aggregator = aggregator_over(store.clone(), AggregatorConfig::default());

    let report = aggregator.resolve(&[FUJI, EVEREST]).await;

    assert_eq!(report.status(), ReportStatus::Complete);
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items[0].coordinate, FUJI);
    assert_eq!(report.items[0].height, 3685.69921875);
    assert_eq!(report.items[1].coordinate, EVEREST);
    assert_eq!(report.items[1].height, 8368.4140625);
    assert_eq!(store.requests(), 2);
}

#[tokio::test]
async fn test_duplicates_share_one_request() {
    let store = FakeTileStore::new().with_height(BENCHMARK, 15, 1.0);
    let aggregator = aggregator_over(store.clone(), AggregatorConfig::default());

    let report = aggregator
        .resolve(&[BENCHMARK, BENCHMARK, BENCHMARK])
        .await;

    assert!(report.is_complete());
    assert_eq!(report.items.len(), 3);
    assert!(report.items.iter().all(|item| item.height == 1.0));
    assert_eq!(store.requests(), 1);
}

#[tokio::test]
async fn test_missing_tile_is_isolated() {
    let store = FakeTileStore::new().with_height(FUJI, 15, 3685.69921875);
    let aggregator = aggregator_over(store, AggregatorConfig::default());

    let report = aggregator.resolve(&[EVEREST, FUJI]).await;

    assert_eq!(report.status(), ReportStatus::PartialFailure);
    let error = report.error.as_ref().unwrap();
    assert_eq!(error.code, ErrorCode::SubrequestsFailed);

    let everest = &report.items[0];
    assert!(!everest.is_resolved());
    assert_eq!(everest.height, 0.0);
    assert_eq!(everest.error.as_ref().unwrap().code, ErrorCode::FetchFailed);
    assert!(everest
        .error
        .as_ref()
        .unwrap()
        .description
        .contains("404"));

    assert_eq!(report.items[1].height, 3685.69921875);
}

#[tokio::test]
async fn test_corrupt_tile_is_decode_failure() {
    let store = FakeTileStore::new().with_raw(FUJI, 15, b"<html>oops</html>".to_vec());
    let aggregator = aggregator_over(store, AggregatorConfig::default());

    let report = aggregator.resolve(&[FUJI]).await;

    assert_eq!(
        report.items[0].error.as_ref().unwrap().code,
        ErrorCode::DecodeFailed
    );
    assert_eq!(
        report.error.as_ref().unwrap().code,
        ErrorCode::SubrequestsFailed
    );
}

#[tokio::test]
async fn test_polar_latitude_rejected_without_request() {
    let store = FakeTileStore::new();
    let aggregator = aggregator_over(store.clone(), AggregatorConfig::default());

    let report = aggregator.resolve(&[Coordinate::new(89.9, 0.0)]).await;

    assert_eq!(
        report.items[0].error.as_ref().unwrap().code,
        ErrorCode::FetchFailed
    );
    assert_eq!(store.requests(), 0);
}

#[tokio::test]
async fn test_zoom_follows_config() {
    let store = FakeTileStore::new().with_height(FUJI, 10, 3700.0);
    let aggregator = aggregator_over(
        store,
        AggregatorConfig::default()
            .with_zoom(10)
            .with_deadline(Duration::from_secs(1)),
    );

    let report = aggregator.resolve(&[FUJI]).await;

    assert!(report.is_complete());
    assert_eq!(report.items[0].height, 3700.0);
}

#[tokio::test]
async fn test_empty_batch() {
    let store = FakeTileStore::new();
    let aggregator = aggregator_over(store.clone(), AggregatorConfig::default());

    let report = aggregator.resolve(&[]).await;

    assert!(report.items.is_empty());
    assert!(report.error.is_none());
    assert_eq!(store.requests(), 0);
}
