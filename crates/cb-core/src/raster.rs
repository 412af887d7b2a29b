//! The persistent raster of a surface and its history snapshots.

use crate::error::RasterError;
use crate::geometry::Rect;
use image::{Rgba, RgbaImage};
use std::sync::Arc;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Byte length of a `width × height` RGBA8 buffer, or `None` when it does
/// not fit in `usize`.
pub fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(4)
}

/// Straight-alpha RGBA8 pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    image: RgbaImage,
}

/// An opaque, restorable capture of a whole raster.
///
/// Cheap to clone: the pixel buffer is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterSnapshot(Arc<RgbaImage>);

impl RasterSnapshot {
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.0
    }
}

impl std::fmt::Debug for RasterSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RasterSnapshot({}x{})", self.width(), self.height())
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Raster({}x{})", self.width(), self.height())
    }
}

impl Raster {
    /// A fully transparent raster.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        if rgba_len(width, height).is_none() {
            return Err(RasterError::TooLarge { width, height });
        }
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    /// Wrap an existing RGBA8 buffer of exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        let expected = rgba_len(width, height).ok_or(RasterError::TooLarge { width, height })?;
        let actual = pixels.len();
        if actual != expected {
            return Err(RasterError::InvalidBuffer { expected, actual });
        }
        RgbaImage::from_raw(width, height, pixels)
            .map(Self::from_image)
            .ok_or(RasterError::InvalidBuffer { expected, actual })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Row-major RGBA8 bytes, no padding.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// The pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(dst) = self.image.get_pixel_mut_checked(x, y) {
            *dst = Rgba(rgba);
        }
    }

    /// Composite `src` over the pixel at `(x, y)` (source-over, straight alpha).
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4]) {
        if src[3] == 0 {
            return;
        }
        let Some(Rgba(dst)) = self.image.get_pixel_mut_checked(x, y) else {
            return;
        };
        if src[3] == 255 {
            *dst = src;
            return;
        }

        let sa = src[3] as f32 / 255.0;
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        for c in 0..3 {
            let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
            dst[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Clear every pixel covered by `rect` (normalized first) to transparent.
    /// Returns `false` when the clipped region is empty.
    pub fn clear_rect(&mut self, rect: &Rect) -> bool {
        let Some((x0, y0, x1, y1)) = rect.pixel_span(self.width(), self.height()) else {
            return false;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, TRANSPARENT);
            }
        }
        true
    }

    /// Clear the whole raster to transparent.
    pub fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = TRANSPARENT;
        }
    }

    /// Capture the current pixels.
    pub fn snapshot(&self) -> RasterSnapshot {
        RasterSnapshot(Arc::new(self.image.clone()))
    }

    /// Replace the raster wholesale with `snapshot`: clear, then draw.
    /// Adopts the snapshot's dimensions if they differ.
    pub fn restore(&mut self, snapshot: &RasterSnapshot) {
        if self.image.dimensions() != snapshot.0.dimensions() {
            self.image = RgbaImage::clone(&snapshot.0);
            return;
        }
        self.clear();
        self.image.copy_from_slice(snapshot.0.as_raw());
    }
}
