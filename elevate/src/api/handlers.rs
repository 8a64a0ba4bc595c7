//! Request handlers.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use super::router::AppState;
use crate::coord::Coordinate;
use crate::elevation::{ElevationReport, ErrorCode, ReportStatus};

/// Query string of `GET /heights`. `coords` holds a JSON array.
#[derive(Debug, Default, Deserialize)]
pub struct HeightsQuery {
    pub coords: Option<String>,
}

/// Body of `POST /heights`.
#[derive(Debug, Deserialize)]
pub struct HeightsRequest {
    pub coords: Vec<Coordinate>,
}

/// Parses a JSON array of `{lon, lat}` objects and validates every entry.
pub fn parse_coordinates(raw: &str) -> Result<Vec<Coordinate>, String> {
    let coords: Vec<Coordinate> =
        serde_json::from_str(raw).map_err(|e| format!("invalid coords: {}", e))?;
    validate(coords)
}

fn validate(coords: Vec<Coordinate>) -> Result<Vec<Coordinate>, String> {
    for (index, coord) in coords.iter().enumerate() {
        coord
            .validate()
            .map_err(|e| format!("coordinate at index {}: {}", index, e))?;
    }
    Ok(coords)
}

/// HTTP status for a report.
pub fn status_for(status: ReportStatus) -> StatusCode {
    match status {
        ReportStatus::Complete => StatusCode::OK,
        ReportStatus::PartialFailure => StatusCode::BAD_GATEWAY,
        ReportStatus::Expired => StatusCode::GATEWAY_TIMEOUT,
        ReportStatus::Rejected => StatusCode::BAD_REQUEST,
    }
}

pub(super) async fn get_heights(
    State(state): State<AppState>,
    query: Result<Query<HeightsQuery>, QueryRejection>,
) -> Response {
    let coords = match query {
        Ok(Query(HeightsQuery { coords: Some(raw) })) => parse_coordinates(&raw),
        Ok(Query(HeightsQuery { coords: None })) => {
            Err("missing 'coords' query parameter".to_string())
        }
        Err(rejection) => Err(rejection.body_text()),
    };
    respond(&state, coords).await
}

pub(super) async fn post_heights(State(state): State<AppState>, body: Bytes) -> Response {
    let coords = serde_json::from_slice::<HeightsRequest>(&body)
        .map_err(|e| format!("invalid request body: {}", e))
        .and_then(|request| validate(request.coords));
    respond(&state, coords).await
}

pub(super) async fn health() -> &'static str {
    "ok"
}

async fn respond(state: &AppState, coords: Result<Vec<Coordinate>, String>) -> Response {
    let report = match coords {
        Ok(coords) => state.aggregator.resolve(&coords).await,
        Err(reason) => {
            debug!(%reason, "Rejected heights request");
            ElevationReport::rejected(ErrorCode::MalformedInput, reason)
        }
    };

    (status_for(report.status()), Json(report)).into_response()
}
