//! Surface-space geometry: points, rectangles, flip scales, transforms.
//!
//! Surface space is the coordinate system of the drawing surface itself,
//! one unit per raster pixel, independent of any CSS scaling applied to the
//! element that displays it. Everything here is a plain value type and every
//! function is total.

use serde::{Deserialize, Serialize};

// ─── Point ───────────────────────────────────────────────────────────────

/// A 2D point. Used for both screen-space and surface-space positions;
/// the owning field documents which space applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - other`.
    pub fn delta_from(self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

// ─── Rect ────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle `{left, top, width, height}`.
///
/// A stored rectangle always has non-negative width and height. Raw,
/// signed rectangles only exist transiently (erase regions, candidate
/// sizes during a resize); see [`Rect::normalized`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rectangle anchored at `origin` with the given (possibly signed) size.
    pub fn from_origin_size(origin: Point, width: f64, height: f64) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// True if either dimension is zero (or the rectangle is inverted
    /// after normalization, which cannot happen).
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Inclusive containment test on a normalized rectangle.
    pub fn contains(&self, p: Point) -> bool {
        let r = self.normalized();
        p.x >= r.left && p.x <= r.right() && p.y >= r.top && p.y <= r.bottom()
    }

    /// Same area with the top-left corner moved to the minimum corner and
    /// both dimensions made non-negative.
    ///
    /// `{50, 50, -20, 30}` becomes `{30, 50, 20, 30}`.
    pub fn normalized(&self) -> Self {
        let (left, width) = if self.width < 0.0 {
            (self.left + self.width, -self.width)
        } else {
            (self.left, self.width)
        };
        let (top, height) = if self.height < 0.0 {
            (self.top + self.height, -self.height)
        } else {
            (self.top, self.height)
        };
        Self::new(left, top, width, height)
    }

    /// Integer pixel span `(x0, y0, x1, y1)` covered by this rectangle,
    /// clipped to a `width × height` raster. Edges round to the nearest
    /// pixel boundary. Returns `None` when nothing remains after clipping.
    pub fn pixel_span(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let r = self.normalized();
        let clamp_x = |v: f64| v.round().clamp(0.0, width as f64) as u32;
        let clamp_y = |v: f64| v.round().clamp(0.0, height as f64) as u32;
        let (x0, x1) = (clamp_x(r.left), clamp_x(r.right()));
        let (y0, y1) = (clamp_y(r.top), clamp_y(r.bottom()));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }
}

// ─── ScaleParams ─────────────────────────────────────────────────────────

/// Mirroring of an element's content on each axis. Each factor is `1.0`
/// (upright) or `-1.0` (mirrored).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleParams {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for ScaleParams {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ScaleParams {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub const fn new(scale_x: f64, scale_y: f64) -> Self {
        Self { scale_x, scale_y }
    }

    pub fn is_flipped_x(&self) -> bool {
        self.scale_x < 0.0
    }

    pub fn is_flipped_y(&self) -> bool {
        self.scale_y < 0.0
    }

    /// Compose with another flip: each axis flips if exactly one side flips.
    pub fn then(self, other: ScaleParams) -> Self {
        Self::new(
            sign(self.scale_x * other.scale_x),
            sign(self.scale_y * other.scale_y),
        )
    }
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

// ─── Transform ───────────────────────────────────────────────────────────

/// Placement of one floating element: where it sits and how it is mirrored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub rect: Rect,
    pub scale_params: ScaleParams,
}

impl Transform {
    pub const fn new(rect: Rect, scale_params: ScaleParams) -> Self {
        Self { rect, scale_params }
    }

    /// Upright transform covering `rect`.
    pub const fn upright(rect: Rect) -> Self {
        Self::new(rect, ScaleParams::IDENTITY)
    }
}

// ─── SurfaceFrame ────────────────────────────────────────────────────────

/// Where the surface sits on screen, measured from its bounding client
/// rectangle. Re-measured on every pointer event because the surface may
/// live inside a scrolled or resized ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFrame {
    /// Screen-space position of the surface's top-left corner.
    pub origin: Point,
    /// Surface units per screen pixel on each axis.
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for SurfaceFrame {
    fn default() -> Self {
        Self::at(Point::ZERO)
    }
}

impl SurfaceFrame {
    /// An unscaled frame at `origin`.
    pub const fn at(origin: Point) -> Self {
        Self {
            origin,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Build a frame from a measured bounding box of `css_width × css_height`
    /// screen pixels displaying a `surface_width × surface_height` raster.
    /// A degenerate box (zero or negative size) falls back to scale 1.
    pub fn from_bounding_box(
        left: f64,
        top: f64,
        css_width: f64,
        css_height: f64,
        surface_width: u32,
        surface_height: u32,
    ) -> Self {
        let ratio = |surface: u32, css: f64| {
            if css > 0.0 { surface as f64 / css } else { 1.0 }
        };
        Self {
            origin: Point::new(left, top),
            scale_x: ratio(surface_width, css_width),
            scale_y: ratio(surface_height, css_height),
        }
    }

    /// Map a screen-space point into surface space.
    pub fn to_surface(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.origin.x) * self.scale_x,
            (screen.y - self.origin.y) * self.scale_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_negative_width() {
        let r = Rect::new(50.0, 50.0, -20.0, 30.0);
        assert_eq!(r.normalized(), Rect::new(30.0, 50.0, 20.0, 30.0));
    }

    #[test]
    fn normalize_keeps_positive_rect() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.normalized(), r);
    }

    #[test]
    fn pixel_span_clips_to_raster() {
        let r = Rect::new(-10.0, 5.0, 30.0, 100.0);
        assert_eq!(r.pixel_span(16, 16), Some((0, 5, 16, 16)));
    }

    #[test]
    fn pixel_span_of_empty_rect_is_none() {
        assert_eq!(Rect::new(4.0, 4.0, 0.0, 10.0).pixel_span(16, 16), None);
        assert_eq!(Rect::new(40.0, 4.0, 5.0, 5.0).pixel_span(16, 16), None);
    }

    #[test]
    fn contains_handles_signed_rect() {
        let r = Rect::new(50.0, 50.0, -20.0, 30.0);
        assert!(r.contains(Point::new(35.0, 60.0)));
        assert!(!r.contains(Point::new(55.0, 60.0)));
    }

    #[test]
    fn scale_params_compose() {
        let flipped = ScaleParams::new(-1.0, 1.0);
        assert_eq!(flipped.then(flipped), ScaleParams::IDENTITY);
        assert_eq!(
            ScaleParams::IDENTITY.then(ScaleParams::new(1.0, -1.0)),
            ScaleParams::new(1.0, -1.0)
        );
    }

    #[test]
    fn surface_frame_maps_scrolled_and_scaled_points() {
        // 400px wide box showing an 800px raster, scrolled to (100, 20).
        let frame = SurfaceFrame::from_bounding_box(100.0, 20.0, 400.0, 300.0, 800, 600);
        assert_eq!(frame.to_surface(Point::new(150.0, 70.0)), Point::new(100.0, 100.0));
    }

    #[test]
    fn surface_frame_degenerate_box_is_unscaled() {
        let frame = SurfaceFrame::from_bounding_box(10.0, 10.0, 0.0, 0.0, 800, 600);
        assert_eq!(frame.to_surface(Point::new(15.0, 12.0)), Point::new(5.0, 2.0));
    }

    #[test]
    fn transform_serializes_camel_case() {
        let t = Transform::new(Rect::new(1.0, 2.0, 3.0, 4.0), ScaleParams::new(-1.0, 1.0));
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"scaleParams\""));
        assert!(json.contains("\"scaleX\":-1.0"));
    }
}
