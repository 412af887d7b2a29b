use thiserror::Error;

/// Failures of resource-backed raster operations.
///
/// Geometry and interaction never fail; only operations that touch the
/// raster buffer, encoded image bytes, or font data report errors.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The surface has no raster yet (not attached).
    #[error("surface is not attached to a raster")]
    Detached,

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },

    /// The byte length of a `width × height` RGBA buffer overflows `usize`.
    #[error("{width}x{height} raster does not fit in memory")]
    TooLarge { width: u32, height: u32 },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to encode raster: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to load font: {0}")]
    Font(String),
}
