//! Text → coverage masks.
//!
//! The compositor never talks to a font directly: it asks a [`GlyphSource`]
//! for an 8-bit coverage mask whose top-left corner is the text's anchor
//! (top baseline). Hosts load a real font into [`FontGlyphs`]; until then
//! [`NoGlyphs`] makes text bakes no-ops.

use ab_glyph::{Font, FontArc, Glyph, ScaleFont, point};
use cb_core::{RasterError, TextStyle};
use image::{GrayImage, Luma};

/// An 8-bit alpha mask whose top-left corner is the text anchor.
pub type Coverage = GrayImage;

/// A zeroed `width × height` mask, or `None` if it is empty or too large
/// to allocate.
fn blank_mask(width: u32, height: u32) -> Option<Coverage> {
    if width == 0 || height == 0 {
        return None;
    }
    (width as usize).checked_mul(height as usize)?;
    Some(GrayImage::new(width, height))
}

/// Anything that can rasterize a text element's content.
pub trait GlyphSource {
    /// Rasterize `text`. `None` means nothing can be drawn (empty text, no
    /// font).
    fn rasterize(&self, text: &str, style: &TextStyle) -> Option<Coverage>;

    /// Size of the mask `rasterize` would produce.
    fn measure(&self, text: &str, style: &TextStyle) -> Option<(f64, f64)> {
        self.rasterize(text, style)
            .map(|c| (c.width() as f64, c.height() as f64))
    }
}

// ─── No font ─────────────────────────────────────────────────────────────

/// Glyph source used before any font is loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGlyphs;

impl GlyphSource for NoGlyphs {
    fn rasterize(&self, _text: &str, _style: &TextStyle) -> Option<Coverage> {
        None
    }
}

// ─── Block glyphs ────────────────────────────────────────────────────────

/// Draws every non-space character as a solid block of
/// `advance × line_height` pixels. Deterministic, font-free; used in tests
/// and as a placeholder renderer.
#[derive(Debug, Clone, Copy)]
pub struct BlockGlyphs {
    pub advance: u32,
    pub line_height: u32,
}

impl Default for BlockGlyphs {
    fn default() -> Self {
        Self {
            advance: 8,
            line_height: 10,
        }
    }
}

impl GlyphSource for BlockGlyphs {
    fn rasterize(&self, text: &str, _style: &TextStyle) -> Option<Coverage> {
        let lines: Vec<&str> = text.split('\n').collect();
        let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
        let width = columns.checked_mul(self.advance)?;
        let height = (lines.len() as u32).checked_mul(self.line_height)?;
        let mut mask = blank_mask(width, height)?;

        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let x0 = col as u32 * self.advance;
                let y0 = row as u32 * self.line_height;
                for y in y0..y0 + self.line_height {
                    for x in x0..x0 + self.advance {
                        mask.put_pixel(x, y, Luma([255]));
                    }
                }
            }
        }
        Some(mask)
    }
}

// ─── Real fonts ──────────────────────────────────────────────────────────

/// Glyph source backed by an outline font (TTF/OTF bytes supplied by the host).
#[derive(Clone)]
pub struct FontGlyphs {
    font: FontArc,
}

impl std::fmt::Debug for FontGlyphs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FontGlyphs")
    }
}

impl FontGlyphs {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RasterError> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| RasterError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Position every glyph of a multi-line string. Returns the glyphs and
    /// the `(width, height)` of the laid-out block.
    fn layout(&self, text: &str, size: f32) -> (Vec<Glyph>, f32, f32) {
        let scaled = self.font.as_scaled(size);
        let ascent = scaled.ascent();
        let line_height = scaled.height() + scaled.line_gap();

        let mut glyphs = Vec::new();
        let mut max_width = 0.0f32;
        let mut line_count = 0usize;

        for (line_idx, line) in text.split('\n').enumerate() {
            line_count += 1;
            let baseline = ascent + line_idx as f32 * line_height;
            let mut caret = 0.0f32;
            let mut prev = None;
            for ch in line.chars() {
                let id = self.font.glyph_id(ch);
                if let Some(p) = prev {
                    caret += scaled.kern(p, id);
                }
                glyphs.push(id.with_scale_and_position(size, point(caret, baseline)));
                caret += scaled.h_advance(id);
                prev = Some(id);
            }
            max_width = max_width.max(caret);
        }

        (glyphs, max_width, line_height * line_count as f32)
    }
}

impl GlyphSource for FontGlyphs {
    fn rasterize(&self, text: &str, style: &TextStyle) -> Option<Coverage> {
        let (glyphs, w, h) = self.layout(text, style.size);
        let mut mask = blank_mask(w.ceil() as u32, h.ceil() as u32)?;
        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, c| {
                let x = bounds.min.x as i32 + gx as i32;
                let y = bounds.min.y as i32 + gy as i32;
                if x < 0 || y < 0 {
                    return;
                }
                if let Some(Luma([a])) = mask.get_pixel_mut_checked(x as u32, y as u32) {
                    *a = (*a).max((c * 255.0).round().clamp(0.0, 255.0) as u8);
                }
            });
        }
        Some(mask)
    }

    fn measure(&self, text: &str, style: &TextStyle) -> Option<(f64, f64)> {
        let (_, w, h) = self.layout(text, style.size);
        (w > 0.0 && h > 0.0).then(|| (w.ceil() as f64, h.ceil() as f64))
    }
}
