//! Floating elements and what they draw.
//!
//! An [`Element`] pairs a [`Drawable`] with its placement while it floats
//! above the raster. Baking consumes the element: once its pixels are in
//! the raster, its identity is gone.

use crate::geometry::{Point, Rect, Transform};
use crate::id::ElementId;
use crate::raster::rgba_len;
use image::RgbaImage;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

// ─── Colors ──────────────────────────────────────────────────────────────

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB`, or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let b = hex.as_bytes();
        let pair = |i: usize| -> Option<u8> { Some(hex_val(b[i])? << 4 | hex_val(b[i + 1])?) };
        let nibble = |i: usize| -> Option<u8> { Some(hex_val(b[i])? * 17) };

        match b.len() {
            3 => Some(Self::rgba(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
            4 => Some(Self::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, 255)),
            8 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => None,
        }
    }

    /// `#RRGGBB` when opaque, `#RRGGBBAA` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color {s:?}")))
    }
}

// ─── Text ────────────────────────────────────────────────────────────────

/// How text elements are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in surface units (pixels).
    pub size: f32,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 24.0,
            color: Color::BLACK,
        }
    }
}

// ─── Bitmaps ─────────────────────────────────────────────────────────────

/// Decoded straight-alpha RGBA8 pixels of an image element.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap(RgbaImage);

impl Bitmap {
    /// Wrap `pixels`, or `None` if the buffer is not `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if rgba_len(width, height)? != pixels.len() {
            return None;
        }
        RgbaImage::from_raw(width, height, pixels).map(Self)
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self(image)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// The pixel at `(x, y)`, transparent outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.0.get_pixel_checked(x, y).map_or([0; 4], |p| p.0)
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitmap({}x{})", self.width(), self.height())
    }
}

// ─── Drawables ───────────────────────────────────────────────────────────

/// Load progress of an image element's pixels.
#[derive(Debug, Clone, Default)]
pub enum ImageState {
    /// The host has not delivered pixels yet.
    #[default]
    Loading,
    Loaded(Arc<Bitmap>),
    /// The reference could not be decoded. The element stays on the surface
    /// until removed, but renders and bakes as nothing.
    Failed,
}

/// What a floating element draws.
#[derive(Debug, Clone)]
pub enum Drawable {
    Image {
        /// Opaque content reference supplied by the host (object URL, data URL).
        source: String,
        state: ImageState,
    },
    Text {
        content: String,
        style: TextStyle,
    },
}

impl Drawable {
    pub fn image(source: impl Into<String>) -> Self {
        Self::Image {
            source: source.into(),
            state: ImageState::Loading,
        }
    }

    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        Self::Text {
            content: content.into(),
            style,
        }
    }

    /// Short kind name used for id prefixes and the render layer.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Image { .. } => "image",
            Self::Text { .. } => "text",
        }
    }

    /// Decoded pixels, if this is a loaded image.
    pub fn bitmap(&self) -> Option<&Arc<Bitmap>> {
        match self {
            Self::Image {
                state: ImageState::Loaded(bitmap),
                ..
            } => Some(bitmap),
            _ => None,
        }
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// One floating, not-yet-baked element.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub drawable: Drawable,
    /// Set once the element has been placed explicitly or transformed.
    /// `None` means it still sits at `offset` with its intrinsic size.
    pub transform: Option<Transform>,
    /// Last known top-left position, used until a transform exists.
    pub offset: Point,
}

impl Element {
    pub fn new(id: ElementId, drawable: Drawable, offset: Point) -> Self {
        Self {
            id,
            drawable,
            transform: None,
            offset,
        }
    }

    /// Intrinsic content size, when known without a transform.
    pub fn intrinsic_size(&self) -> Option<(f64, f64)> {
        self.drawable
            .bitmap()
            .map(|b| (b.width() as f64, b.height() as f64))
    }

    /// Effective placement: the explicit transform, or the intrinsic size at
    /// the last known offset. `None` while an image has no pixels and has
    /// never been placed.
    pub fn placement(&self) -> Option<Transform> {
        self.transform.or_else(|| {
            self.intrinsic_size()
                .map(|(w, h)| Transform::upright(Rect::from_origin_size(self.offset, w, h)))
        })
    }

    /// Replace the transform and remember its position as the last offset.
    pub fn set_transform(&mut self, transform: Transform) {
        self.offset = transform.rect.origin();
        self.transform = Some(transform);
    }
}
