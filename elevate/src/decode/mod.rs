//! Terrain pixel decoding.
//!
//! Terrain tiles ("terrarium" encoding) pack elevation in meters across the
//! red, green and blue channels of a PNG:
//!
//! ```text
//! height = R·256 + G + B/256 − 32768
//! ```
//!
//! The blue channel carries sub-meter precision and `32768` is the zero
//! offset. Alpha is ignored.

use image::{GenericImageView, ImageFormat};
use thiserror::Error;

use crate::coord::PixelOffset;

/// Elevation offset of the encoding, in meters.
pub const HEIGHT_OFFSET: f64 = 32768.0;

/// Errors that can occur while extracting a height from a tile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not a decodable PNG raster.
    #[error("Invalid terrain image: {0}")]
    InvalidImage(String),

    /// The requested pixel lies outside the decoded raster.
    #[error("Pixel ({x}, {y}) outside {width}×{height} raster")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl From<image::ImageError> for DecodeError {
    fn from(e: image::ImageError) -> Self {
        DecodeError::InvalidImage(e.to_string())
    }
}

/// Computes the elevation encoded by one pixel's channels.
#[inline]
pub fn terrarium_height(r: u8, g: u8, b: u8) -> f64 {
    r as f64 * 256.0 + g as f64 + b as f64 / 256.0 - HEIGHT_OFFSET
}

/// Encodes a height into channel values, the inverse of [`terrarium_height`].
///
/// Heights outside the representable range saturate at its ends.
pub fn terrarium_rgb(height: f64) -> [u8; 3] {
    let value = (height + HEIGHT_OFFSET).clamp(0.0, 65535.0 + 255.0 / 256.0);
    let whole = value.floor();
    let r = (whole / 256.0).floor() as u8;
    let g = (whole as u32 % 256) as u8;
    let b = ((value - whole) * 256.0).floor() as u8;
    [r, g, b]
}

/// Decodes a terrain tile and reads the height at `offset`.
///
/// # Arguments
///
/// * `raster` - Raw PNG bytes as served by the tile store
/// * `offset` - Pixel within the tile (from [`crate::coord::project`])
///
/// # Errors
///
/// [`DecodeError::InvalidImage`] when the bytes are not a PNG, and
/// [`DecodeError::PixelOutOfBounds`] when the raster is smaller than expected.
pub fn decode_height(raster: &[u8], offset: PixelOffset) -> Result<f64, DecodeError> {
    let image = image::load_from_memory_with_format(raster, ImageFormat::Png)?;

    let (width, height) = image.dimensions();
    if offset.x >= width || offset.y >= height {
        return Err(DecodeError::PixelOutOfBounds {
            x: offset.x,
            y: offset.y,
            width,
            height,
        });
    }

    let [r, g, b, _alpha] = image.get_pixel(offset.x, offset.y).0;
    Ok(terrarium_height(r, g, b))
}
