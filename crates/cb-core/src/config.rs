//! Surface configuration.

use crate::geometry::Point;
use crate::model::TextStyle;
use serde::Deserialize;

/// Per-surface settings. Every field has a default, so a host may pass a
/// partial JSON object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceConfig {
    /// Raster width in surface units.
    pub width: u32,
    /// Raster height in surface units.
    pub height: u32,
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
    /// Where toolbar-added elements appear.
    pub default_position: Point,
    /// Side length of the square resize handle at an element's
    /// bottom-right corner.
    pub handle_size: f64,
    /// Content of a freshly added text element.
    pub default_text: String,
    pub text_style: TextStyle,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            history_depth: 100,
            default_position: Point::ZERO,
            handle_size: 10.0,
            default_text: "Text".to_string(),
            text_style: TextStyle::default(),
        }
    }
}

impl SurfaceConfig {
    /// Default configuration for a `width × height` surface.
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}
