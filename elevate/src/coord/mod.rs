//! Geodetic to tile projection.
//!
//! Maps geographic coordinates onto the Web Mercator tile grid used by the
//! terrain tile store: which tile a coordinate falls into, and which pixel of
//! that tile's 256×256 raster it lands on.

mod types;

pub use types::{
    CoordError, Coordinate, PixelOffset, TileAddress, DEFAULT_ZOOM, MAX_LAT, MAX_LON, MAX_ZOOM,
    MIN_LAT, MIN_LON, TILE_SIZE,
};

use std::f64::consts::PI;

/// Bound applied to `sin(lat)` before the Mercator logarithm.
///
/// Limits the effective latitude to about ±89.19°, roughly a third of a tile
/// past the edge of the world tile, and keeps the logarithm finite at the poles.
pub const SINY_LIMIT: f64 = 0.9999;

/// Returns the zoom-0 world position of a coordinate, in pixels of the
/// single 256×256 world tile.
#[inline]
pub fn world_position(coord: &Coordinate) -> (f64, f64) {
    let tile_size = TILE_SIZE as f64;
    let siny = (coord.lat * PI / 180.0)
        .sin()
        .clamp(-SINY_LIMIT, SINY_LIMIT);

    let world_x = tile_size * (0.5 + coord.lon / 360.0);
    let world_y = tile_size * (0.5 - ((1.0 + siny) / (1.0 - siny)).ln() / (4.0 * PI));

    (world_x, world_y)
}

/// Projects a coordinate to the tile containing it and the pixel within
/// that tile.
///
/// Pure and total: identical inputs always produce identical outputs, and
/// every finite input produces finite indices. Range validation is the
/// caller's job (see [`Coordinate::validated`]).
///
/// # Arguments
///
/// * `coord` - Latitude/longitude in degrees
/// * `zoom` - Zoom level of the tile grid
#[inline]
pub fn project(coord: &Coordinate, zoom: u8) -> (TileAddress, PixelOffset) {
    let (world_x, world_y) = world_position(coord);
    let scale = 2.0_f64.powi(zoom as i32);

    let pixel_x = world_x * scale;
    let pixel_y = world_y * scale;

    let tile = TileAddress {
        zoom,
        x: tile_index(pixel_x),
        y: tile_index(pixel_y),
    };
    let offset = PixelOffset {
        x: pixel_within_tile(pixel_x),
        y: pixel_within_tile(pixel_y),
    };

    (tile, offset)
}

/// Checks that a zoom level is within the supported range.
pub fn validate_zoom(zoom: u8) -> Result<u8, CoordError> {
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }
    Ok(zoom)
}

/// Returns the coordinate of a tile's northwest corner.
#[inline]
pub fn tile_origin(tile: &TileAddress) -> Coordinate {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;
    let y = tile.y as f64 / n;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan() * 180.0 / PI;

    Coordinate::new(lat, lon)
}

#[inline]
fn tile_index(global_pixel: f64) -> i64 {
    (global_pixel / TILE_SIZE as f64).floor() as i64
}

// Euclidean remainder keeps the offset in [0, TILE_SIZE) and consistent with
// the floored tile index for negative world positions.
#[inline]
fn pixel_within_tile(global_pixel: f64) -> u32 {
    global_pixel.floor().rem_euclid(TILE_SIZE as f64) as u32
}
