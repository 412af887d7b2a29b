//! Canvas2D presentation.
//!
//! Blits the surface preview (raster plus floating elements) through
//! `ImageData`, then strokes gizmos and the selection marquee on top.

use cb_core::{Raster, Rect};
use cb_editor::{ElementView, SelectionRegion};
use wasm_bindgen::{Clamped, JsValue};
use web_sys::{CanvasRenderingContext2d, ImageData};

const ACCENT: &str = "#4FC3F7";

/// Draw one frame.
pub fn render_surface(
    ctx: &CanvasRenderingContext2d,
    preview: &Raster,
    views: &[ElementView],
    selection: Option<&SelectionRegion>,
    handle_size: f64,
) -> Result<(), JsValue> {
    let image = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(preview.pixels()),
        preview.width(),
        preview.height(),
    )?;
    ctx.put_image_data(&image, 0.0, 0.0)?;

    for view in views.iter().filter(|v| v.is_gizmo_visible) {
        if let Some(transform) = view.transform {
            draw_gizmo(ctx, &transform.rect.normalized(), view.is_resizable, handle_size);
        }
    }
    if let Some(region) = selection {
        draw_marquee_rect(ctx, &region.display.rect);
    }
    Ok(())
}

/// Outline of the selected element, plus its bottom-right resize handle.
fn draw_gizmo(ctx: &CanvasRenderingContext2d, r: &Rect, resizable: bool, handle_size: f64) {
    ctx.save();
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(r.left, r.top, r.width, r.height);

    if resizable {
        let half = handle_size / 2.0;
        ctx.set_fill_style_str("#FFFFFF");
        ctx.set_line_width(1.5);
        ctx.fill_rect(r.right() - half, r.bottom() - half, handle_size, handle_size);
        ctx.stroke_rect(r.right() - half, r.bottom() - half, handle_size, handle_size);
    }
    ctx.restore();
}

/// Draw the marquee (rubber-band) selection rectangle.
fn draw_marquee_rect(ctx: &CanvasRenderingContext2d, r: &Rect) {
    if r.width < 1.0 && r.height < 1.0 {
        return;
    }

    ctx.save();

    ctx.set_fill_style_str("rgba(79, 195, 247, 0.08)");
    ctx.fill_rect(r.left, r.top, r.width, r.height);

    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(1.0);
    let _ = ctx.set_line_dash(&js_sys::Array::of2(
        &JsValue::from_f64(4.0),
        &JsValue::from_f64(4.0),
    ));
    ctx.stroke_rect(r.left, r.top, r.width, r.height);

    ctx.restore();
}
