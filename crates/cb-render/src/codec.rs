//! Encoded image bytes ↔ pixels.
//!
//! Decoding turns imported files into element bitmaps; encoding turns the
//! raster into the exported PNG/JPEG (optionally as a data URL).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cb_core::{Bitmap, Raster, RasterError};
use image::buffer::ConvertBuffer;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// Export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    /// Alpha is dropped.
    Jpeg,
}

impl ExportFormat {
    /// Parse a MIME type or short name (`"image/png"`, `"jpeg"`, `"jpg"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "png" | "image/png" => Some(Self::Png),
            "jpg" | "jpeg" | "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Decode PNG/JPEG bytes into an RGBA bitmap.
pub fn decode_bitmap(bytes: &[u8]) -> Result<Bitmap, RasterError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    Ok(Bitmap::from_image(decoded))
}

/// Encode the raster's current pixels.
pub fn encode_raster(raster: &Raster, format: ExportFormat) -> Result<Vec<u8>, RasterError> {
    let mut bytes = Vec::new();
    let mut out = Cursor::new(&mut bytes);
    let written = match format {
        ExportFormat::Png => raster.image().write_to(&mut out, ImageFormat::Png),
        ExportFormat::Jpeg => {
            let rgb: RgbImage = raster.image().convert();
            rgb.write_to(&mut out, ImageFormat::Jpeg)
        }
    };
    written.map_err(RasterError::Encode)?;
    log::debug!(
        "EXPORT {}x{} as {} ({} bytes)",
        raster.width(),
        raster.height(),
        format.mime(),
        bytes.len()
    );
    Ok(bytes)
}

/// Encode the raster as a `data:` URL.
pub fn to_data_url(raster: &Raster, format: ExportFormat) -> Result<String, RasterError> {
    let bytes = encode_raster(raster, format)?;
    Ok(format!("data:{};base64,{}", format.mime(), STANDARD.encode(bytes)))
}
