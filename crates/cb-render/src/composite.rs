//! Floating element → raster compositing, and rectangular erase.
//!
//! Placement follows the 2D-canvas convention: the drawing context is
//! scaled by the element's `(scale_x, scale_y)` and the destination
//! coordinates are pre-multiplied by the same factors, so a negative scale
//! both mirrors the pixels and lands them back inside the element's
//! rectangle. Sampling is nearest-neighbour at device pixel centres;
//! blending is source-over.
//!
//! Nothing here touches history. The caller snapshots once per gesture.

use crate::glyphs::{Coverage, GlyphSource, NoGlyphs};
use cb_core::{Bitmap, Color, Drawable, Element, Point, Raster, Rect, ScaleParams, Transform};
use kurbo::Affine;

/// Bakes drawables into a raster. Owns the glyph source used for text.
pub struct Compositor {
    glyphs: Box<dyn GlyphSource>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Box::new(NoGlyphs))
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor").finish_non_exhaustive()
    }
}

impl Compositor {
    pub fn new(glyphs: Box<dyn GlyphSource>) -> Self {
        Self { glyphs }
    }

    pub fn set_glyphs(&mut self, glyphs: Box<dyn GlyphSource>) {
        self.glyphs = glyphs;
    }

    pub fn glyphs(&self) -> &dyn GlyphSource {
        self.glyphs.as_ref()
    }

    /// Bake a floating element at its current placement.
    pub fn bake_element(&self, element: &Element, raster: &mut Raster) -> bool {
        self.bake(
            &element.drawable,
            element.transform.as_ref(),
            element.offset,
            raster,
        )
    }

    /// Draw `drawable` into `raster`.
    ///
    /// Returns `true` when the drawable had content to composite and is now
    /// consumed, even if it landed fully outside the raster or has a
    /// degenerate rect. Returns `false` when it was skipped: an image
    /// without pixels, or text the glyph source cannot draw.
    ///
    /// Without a transform, the drawable is placed at `offset` with its
    /// intrinsic size.
    pub fn bake(
        &self,
        drawable: &Drawable,
        transform: Option<&Transform>,
        offset: Point,
        raster: &mut Raster,
    ) -> bool {
        match drawable {
            Drawable::Image { source, .. } => {
                let Some(bitmap) = drawable.bitmap() else {
                    log::warn!("bake skipped: image {source:?} has no pixels");
                    return false;
                };
                let transform = transform.copied().unwrap_or_else(|| {
                    Transform::upright(Rect::from_origin_size(
                        offset,
                        bitmap.width() as f64,
                        bitmap.height() as f64,
                    ))
                });
                let wrote = draw_bitmap(raster, bitmap, &transform);
                log::trace!("BAKE image {source:?} {transform:?} wrote={wrote}");
                true
            }
            Drawable::Text { content, style } => {
                let Some(coverage) = self.glyphs.rasterize(content, style) else {
                    log::warn!("bake skipped: no glyphs for text {content:?}");
                    return false;
                };
                let transform = transform.copied().unwrap_or_else(|| {
                    Transform::upright(Rect::from_origin_size(
                        offset,
                        coverage.width() as f64,
                        coverage.height() as f64,
                    ))
                });
                let wrote = draw_coverage(raster, &coverage, style.color, &transform);
                log::trace!("BAKE text {content:?} {transform:?} wrote={wrote}");
                true
            }
        }
    }
}

/// Clear the raw, start-relative `rect` to transparent.
///
/// `rect` is anchored at the erase start point and sized by the signed
/// pointer delta; a negative size extends left/up from the anchor, exactly
/// like a 2D-canvas `clearRect`. Returns `false` when nothing was cleared.
pub fn erase_region(rect: &Rect, raster: &mut Raster) -> bool {
    log::debug!("ERASE {rect:?}");
    raster.clear_rect(rect)
}

// ─── Images ──────────────────────────────────────────────────────────────

fn draw_bitmap(raster: &mut Raster, bitmap: &Bitmap, transform: &Transform) -> bool {
    let rect = transform.rect;
    if bitmap.is_empty() || rect.is_empty() {
        return false;
    }
    let ScaleParams { scale_x, scale_y } = transform.scale_params;

    // Destination in the scaled context: the rect pre-multiplied by the
    // scale, drawn upright. The context scale then mirrors it into place.
    let dest = kurbo::Rect::new(
        rect.left * scale_x,
        rect.top * scale_y,
        rect.right() * scale_x,
        rect.bottom() * scale_y,
    )
    .abs();
    let to_device = Affine::scale_non_uniform(scale_x, scale_y)
        * Affine::translate((dest.x0, dest.y0))
        * Affine::scale_non_uniform(
            dest.width() / bitmap.width() as f64,
            dest.height() / bitmap.height() as f64,
        );

    sample_into(
        raster,
        to_device,
        (bitmap.width(), bitmap.height()),
        |u, v| bitmap.pixel(u, v),
    )
}

// ─── Text ────────────────────────────────────────────────────────────────

fn draw_coverage(
    raster: &mut Raster,
    coverage: &Coverage,
    color: Color,
    transform: &Transform,
) -> bool {
    let rect = transform.rect;
    let ScaleParams { scale_x, scale_y } = transform.scale_params;

    // Text anchors at its top-left edge. Under a mirrored axis that edge
    // would land outside the rect, so shift the anchor by the rect size
    // before the context scale is applied.
    let anchor_x = rect.left * scale_x - if scale_x < 0.0 { rect.width } else { 0.0 };
    let anchor_y = rect.top * scale_y - if scale_y < 0.0 { rect.height } else { 0.0 };
    let to_device =
        Affine::scale_non_uniform(scale_x, scale_y) * Affine::translate((anchor_x, anchor_y));

    let [r, g, b, a] = color.to_array();
    sample_into(raster, to_device, coverage.dimensions(), |u, v| {
        let cov = coverage.get_pixel(u, v)[0] as u32;
        [r, g, b, ((a as u32 * cov + 127) / 255) as u8]
    })
}

// ─── Sampling ────────────────────────────────────────────────────────────

/// Blend a `size`-pixel source, placed by `to_device`, into the raster.
fn sample_into(
    raster: &mut Raster,
    to_device: Affine,
    size: (u32, u32),
    sample: impl Fn(u32, u32) -> [u8; 4],
) -> bool {
    let (sw, sh) = size;
    if sw == 0 || sh == 0 || to_device.determinant() == 0.0 {
        return false;
    }
    let bbox = to_device.transform_rect_bbox(kurbo::Rect::new(0.0, 0.0, sw as f64, sh as f64));
    let device = Rect::new(bbox.x0, bbox.y0, bbox.width(), bbox.height());
    let Some((x0, y0, x1, y1)) = device.pixel_span(raster.width(), raster.height()) else {
        return false;
    };

    let to_source = to_device.inverse();
    let mut wrote = false;
    for y in y0..y1 {
        for x in x0..x1 {
            let p = to_source * kurbo::Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let (u, v) = (p.x.floor(), p.y.floor());
            if u < 0.0 || v < 0.0 || u >= sw as f64 || v >= sh as f64 {
                continue;
            }
            raster.blend_pixel(x, y, sample(u as u32, v as u32));
            wrote = true;
        }
    }
    wrote
}
