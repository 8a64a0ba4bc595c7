//! Argument parsing shared across CLI commands.

use elevate::coord::Coordinate;

use crate::error::CliError;

/// Parses a `LAT,LON` pair in decimal degrees.
pub fn parse_lat_lon(input: &str) -> Result<Coordinate, CliError> {
    let invalid = |reason: String| CliError::InvalidCoordinate {
        input: input.to_string(),
        reason,
    };

    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| invalid("expected LAT,LON".to_string()))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| invalid(format!("'{}' is not a number", lat.trim())))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| invalid(format!("'{}' is not a number", lon.trim())))?;

    Coordinate::validated(lat, lon).map_err(|e| invalid(e.to_string()))
}
