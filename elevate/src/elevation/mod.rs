//! Elevation samples and batch reports.
//!
//! These are the values the aggregator produces and the HTTP layer
//! serializes. Per-item errors live on [`ElevationSample`]; the report-level
//! error on [`ElevationReport`] describes the request as a whole.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

/// Kind of failure carried by an [`ErrorDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Caller supplied coordinates could not be parsed or are out of range.
    MalformedInput,
    /// The tile for a coordinate could not be retrieved.
    FetchFailed,
    /// The tile was retrieved but no height could be read from it.
    DecodeFailed,
    /// At least one coordinate in the batch failed to resolve.
    SubrequestsFailed,
    /// The batch deadline elapsed before every coordinate resolved.
    TimerExpired,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedInput => "MalformedInput",
            ErrorCode::FetchFailed => "FetchFailed",
            ErrorCode::DecodeFailed => "DecodeFailed",
            ErrorCode::SubrequestsFailed => "SubrequestsFailed",
            ErrorCode::TimerExpired => "TimerExpired",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error code plus a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub code: ErrorCode,
    pub description: String,
}

impl ErrorDescriptor {
    pub fn new(code: ErrorCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

/// Height resolved for one coordinate.
///
/// On failure `height` stays at `0.0` and `error` is set. `point` and
/// `height` are always serialized, `error` only when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    #[serde(rename = "point")]
    pub coordinate: Coordinate,
    /// Height in meters.
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescriptor>,
}

impl ElevationSample {
    pub fn resolved(coordinate: Coordinate, height: f64) -> Self {
        Self {
            coordinate,
            height,
            error: None,
        }
    }

    pub fn failed(coordinate: Coordinate, error: ErrorDescriptor) -> Self {
        Self {
            coordinate,
            height: 0.0,
            error: Some(error),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.error.is_none()
    }
}

/// Coarse outcome of a batch, derived from the report-level error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// Every coordinate resolved.
    Complete,
    /// All coordinates finished but at least one failed.
    PartialFailure,
    /// The deadline elapsed; only coordinates resolved in time are listed.
    Expired,
    /// The request was rejected before any lookup ran.
    Rejected,
}

/// Ordered heights for a batch of coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElevationReport {
    /// One sample per requested position, in request order.
    #[serde(default)]
    pub items: Vec<ElevationSample>,
    /// Request scoped error, distinct from per-item errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescriptor>,
}

impl ElevationReport {
    /// A report that rejects the request without items.
    pub fn rejected(code: ErrorCode, description: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            error: Some(ErrorDescriptor::new(code, description)),
        }
    }

    pub fn status(&self) -> ReportStatus {
        match self.error.as_ref().map(|e| e.code) {
            None => ReportStatus::Complete,
            Some(ErrorCode::TimerExpired) => ReportStatus::Expired,
            Some(ErrorCode::MalformedInput) => ReportStatus::Rejected,
            Some(_) => ReportStatus::PartialFailure,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == ReportStatus::Complete
    }
}
