//! Coordinate types for the terrain tile grid.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Edge length of a terrain tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Zoom level used for elevation lookups unless configured otherwise.
pub const DEFAULT_ZOOM: u8 = 15;

/// Highest zoom level the projector accepts from configuration.
///
/// `2^22` tiles per axis still fits comfortably in `i64` world pixels.
pub const MAX_ZOOM: u8 = 22;

/// Minimum latitude accepted by [`Coordinate::validated`].
pub const MIN_LAT: f64 = -90.0;

/// Maximum latitude accepted by [`Coordinate::validated`].
pub const MAX_LAT: f64 = 90.0;

/// Minimum longitude accepted by [`Coordinate::validated`].
pub const MIN_LON: f64 = -180.0;

/// Maximum longitude accepted by [`Coordinate::validated`].
pub const MAX_LON: f64 = 180.0;

/// Errors raised while validating caller supplied coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (expected -90..=90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (expected -180..=180)")]
    InvalidLongitude(f64),

    #[error("Invalid zoom level: {0} (max 22)")]
    InvalidZoom(u8),
}

/// A geographic position in degrees.
///
/// Two coordinates are the same key when their values are exactly equal,
/// which is what the aggregator deduplicates on. `-0.0` and `0.0` compare
/// equal as floats, so they also hash equally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate without range checks.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lon, lat }
    }

    /// Creates a coordinate, rejecting values outside the geographic range.
    ///
    /// NaN and infinities are rejected as well.
    pub fn validated(lat: f64, lon: f64) -> Result<Self, CoordError> {
        Self::new(lat, lon).validate()
    }

    /// Checks this coordinate against the geographic range.
    pub fn validate(self) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&self.lat) {
            return Err(CoordError::InvalidLatitude(self.lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&self.lon) {
            return Err(CoordError::InvalidLongitude(self.lon));
        }
        Ok(self)
    }

    fn key_bits(&self) -> (u64, u64) {
        // Adding 0.0 folds -0.0 into +0.0.
        ((self.lat + 0.0).to_bits(), (self.lon + 0.0).to_bits())
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.key_bits() == other.key_bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_bits().hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Address of one raster tile in the Web Mercator grid.
///
/// `x` grows eastward and `y` southward. The projector never fails, so an
/// address may fall outside the grid for inputs at the extreme edges
/// (longitude exactly 180°, clamped polar latitudes); see
/// [`TileAddress::is_within_grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
    pub zoom: u8,
    pub x: i64,
    pub y: i64,
}

impl TileAddress {
    pub fn new(zoom: u8, x: i64, y: i64) -> Self {
        Self { zoom, x, y }
    }

    /// Number of tiles along one axis at this zoom level.
    pub fn grid_size(&self) -> i64 {
        1i64 << self.zoom
    }

    /// Returns true when both indices name an existing tile.
    pub fn is_within_grid(&self) -> bool {
        let n = self.grid_size();
        (0..n).contains(&self.x) && (0..n).contains(&self.y)
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Pixel position inside a tile, both axes in `[0, TILE_SIZE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelOffset {
    pub x: u32,
    pub y: u32,
}

impl PixelOffset {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_validated_accepts_range_edges() {
        assert!(Coordinate::validated(90.0, 180.0).is_ok());
        assert!(Coordinate::validated(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_validated_rejects_out_of_range() {
        assert_eq!(
            Coordinate::validated(90.5, 0.0),
            Err(CoordError::InvalidLatitude(90.5))
        );
        assert_eq!(
            Coordinate::validated(0.0, -180.1),
            Err(CoordError::InvalidLongitude(-180.1))
        );
    }

    #[test]
    fn test_validated_rejects_nan() {
        assert!(matches!(
            Coordinate::validated(f64::NAN, 0.0),
            Err(CoordError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::validated(0.0, f64::INFINITY),
            Err(CoordError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_negative_zero_is_same_key() {
        let a = Coordinate::new(0.0, 10.0);
        let b = Coordinate::new(-0.0, 10.0);
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_distinct_values_are_distinct_keys() {
        let a = Coordinate::new(35.360638, 138.72905);
        let b = Coordinate::new(35.360638, 138.729051);
        assert_ne!(a, b);
    }

    #[test]
    fn test_tile_address_grid_bounds() {
        assert!(TileAddress::new(15, 0, 0).is_within_grid());
        assert!(TileAddress::new(15, 32767, 32767).is_within_grid());
        assert!(!TileAddress::new(15, 32768, 0).is_within_grid());
        assert!(!TileAddress::new(15, 0, -1).is_within_grid());
        assert_eq!(TileAddress::new(0, 0, 0).grid_size(), 1);
    }

    #[test]
    fn test_tile_address_display() {
        assert_eq!(TileAddress::new(15, 8405, 12182).to_string(), "15/8405/12182");
    }

    #[test]
    fn test_coordinate_serde_field_names() {
        let json = serde_json::to_string(&Coordinate::new(35.5, 138.5)).unwrap();
        assert_eq!(json, r#"{"lon":138.5,"lat":35.5}"#);

        let parsed: Coordinate = serde_json::from_str(r#"{"lat":1.0,"lon":2.0}"#).unwrap();
        assert_eq!(parsed, Coordinate::new(1.0, 2.0));
    }
}
