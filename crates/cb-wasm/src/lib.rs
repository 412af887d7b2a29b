//! WASM bridge for Canvas Bake: exposes the surface engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page forwards
//! pointer events together with the canvas element's bounding client rect
//! (re-measured per event), keyboard events, and toolbar actions.

mod console;
mod render2d;

use cb_core::{Bitmap, ElementId, SurfaceConfig, SurfaceFrame};
use cb_editor::{InputEvent, Modifiers, ShortcutMap, Surface, ToolKind};
use cb_render::ExportFormat;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing surface controller.
///
/// All interaction from the page goes through this struct.
#[wasm_bindgen]
pub struct BakeCanvas {
    surface: Surface,
}

#[wasm_bindgen]
impl BakeCanvas {
    /// Create an attached surface of `width × height` pixels. Throws when
    /// the size cannot be allocated.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Result<BakeCanvas, JsValue> {
        Self::from_config(SurfaceConfig::sized(width, height))
    }

    /// Create an attached surface from a JSON `SurfaceConfig`. Missing
    /// fields take their defaults.
    pub fn with_config(json: &str) -> Result<BakeCanvas, JsValue> {
        let config: SurfaceConfig = serde_json::from_str(json).map_err(js_error)?;
        Self::from_config(config)
    }

    /// Route `log` output to the browser console at `level`
    /// (`"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`).
    pub fn set_log_level(&self, level: &str) {
        console::init_logging(console::parse_level(level));
    }

    /// Draw the raster, floating elements, gizmo and marquee.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let Some(preview) = self.surface.preview() else {
            return Ok(());
        };
        render2d::render_surface(
            ctx,
            &preview,
            &self.surface.element_views(),
            self.surface.selection(),
            self.surface.config().handle_size,
        )
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    /// Handle pointer down. `rect_*` is the canvas element's current
    /// bounding client rect. Returns true if a re-render is needed.
    pub fn handle_pointer_down(
        &mut self,
        client_x: f64,
        client_y: f64,
        rect_left: f64,
        rect_top: f64,
        rect_width: f64,
        rect_height: f64,
    ) -> bool {
        let frame = self.frame(rect_left, rect_top, rect_width, rect_height);
        self.surface
            .handle(&InputEvent::pointer_down(client_x, client_y, frame))
    }

    /// Handle pointer move. Returns true if a re-render is needed.
    pub fn handle_pointer_move(
        &mut self,
        client_x: f64,
        client_y: f64,
        rect_left: f64,
        rect_top: f64,
        rect_width: f64,
        rect_height: f64,
    ) -> bool {
        let frame = self.frame(rect_left, rect_top, rect_width, rect_height);
        self.surface
            .handle(&InputEvent::pointer_move(client_x, client_y, frame))
    }

    /// Handle pointer up. Returns a JSON string:
    /// `{"changed":bool, "toolSwitched":bool, "tool":"<name>"}`
    pub fn handle_pointer_up(
        &mut self,
        client_x: f64,
        client_y: f64,
        rect_left: f64,
        rect_top: f64,
        rect_width: f64,
        rect_height: f64,
    ) -> String {
        let before = self.surface.tool();
        let frame = self.frame(rect_left, rect_top, rect_width, rect_height);
        let changed = self
            .surface
            .handle(&InputEvent::pointer_up(client_x, client_y, frame));
        let tool = self.surface.tool();
        serde_json::json!({
            "changed": changed,
            "toolSwitched": tool != before,
            "tool": tool.name(),
        })
        .to_string()
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>", "tool":"<tool_name>"}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let action = ShortcutMap::resolve(key, ctrl, shift, alt, meta);
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let changed = self.surface.handle(&InputEvent::key(key, modifiers));
        serde_json::json!({
            "changed": changed,
            "action": action.map_or("none", |a| a.name()),
            "tool": self.surface.tool().name(),
        })
        .to_string()
    }

    // ─── Toolbar API ─────────────────────────────────────────────────────

    /// Switch the active tool. Unknown names select the Select tool.
    pub fn set_tool(&mut self, name: &str) -> bool {
        self.surface
            .set_tool(ToolKind::from_name(name).unwrap_or_default())
    }

    pub fn get_tool_name(&self) -> String {
        self.surface.tool().name().to_string()
    }

    /// Add an image element for an opaque source reference. Returns its id.
    pub fn add_image_element(&mut self, source: &str) -> String {
        self.surface.add_image_element(source).to_string()
    }

    /// Decode PNG/JPEG bytes for image element `id`. On failure the element
    /// is marked failed and an `Error` is thrown.
    pub fn load_image_bytes(&mut self, id: &str, bytes: &[u8]) -> Result<(), JsValue> {
        let id = lookup(id)?;
        self.surface.load_image_bytes(id, bytes).map_err(js_error)
    }

    /// Attach already-decoded RGBA pixels (e.g. from `ImageData.data`).
    pub fn attach_image_data(&mut self, id: &str, width: u32, height: u32, pixels: Vec<u8>) -> bool {
        let (Some(id), Some(bitmap)) = (ElementId::get(id), Bitmap::new(width, height, pixels))
        else {
            return false;
        };
        self.surface.attach_bitmap(id, bitmap)
    }

    /// Mark image element `id` as unloadable.
    pub fn mark_image_failed(&mut self, id: &str) -> bool {
        ElementId::get(id).is_some_and(|id| self.surface.mark_image_failed(id))
    }

    /// Add a text element with the default content. Returns its id.
    pub fn add_text_element(&mut self) -> String {
        self.surface.add_text_element().to_string()
    }

    pub fn remove_element(&mut self, index: usize) -> bool {
        self.surface.remove_element(index)
    }

    pub fn change_text(&mut self, index: usize, content: &str) -> bool {
        self.surface.change_text(index, content)
    }

    /// Bake one element into the raster.
    pub fn bake_element(&mut self, index: usize) -> bool {
        self.surface.bake_element(index)
    }

    /// Bake every floating element as one undo step.
    pub fn bake_all(&mut self) -> bool {
        self.surface.bake_all()
    }

    pub fn erase_selection(&mut self) -> bool {
        self.surface.erase_selection()
    }

    pub fn undo(&mut self) -> bool {
        self.surface.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.surface.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.surface.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.surface.can_redo()
    }

    /// Load TTF/OTF bytes used to draw text elements.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.surface.load_font(bytes).map_err(js_error)
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Encode the raster as `"png"` or `"jpeg"` bytes.
    pub fn export_raster(&self, format: &str) -> Result<Vec<u8>, JsValue> {
        self.surface
            .export_raster(export_format(format)?)
            .map_err(js_error)
    }

    /// Encode the raster as a `data:` URL.
    pub fn export_data_url(&self, format: &str) -> Result<String, JsValue> {
        self.surface
            .export_data_url(export_format(format)?)
            .map_err(js_error)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Floating elements as a JSON array of element views.
    pub fn get_elements_json(&self) -> String {
        elements_json(&self.surface)
    }

    /// The selection marquee as JSON `{"rect":{...},"scaleParams":{...}}`,
    /// or `null`.
    pub fn get_selection_json(&self) -> String {
        selection_json(&self.surface)
    }
}

impl BakeCanvas {
    fn from_config(config: SurfaceConfig) -> Result<Self, JsValue> {
        console::console_error_panic_hook_setup();
        let mut surface = Surface::new(config);
        surface.attach().map_err(js_error)?;
        Ok(Self { surface })
    }

    fn frame(&self, left: f64, top: f64, width: f64, height: f64) -> SurfaceFrame {
        let config = self.surface.config();
        SurfaceFrame::from_bounding_box(left, top, width, height, config.width, config.height)
    }
}

fn elements_json(surface: &Surface) -> String {
    serde_json::to_string(&surface.element_views()).unwrap_or_else(|_| "[]".to_string())
}

fn selection_json(surface: &Surface) -> String {
    surface
        .selection()
        .and_then(|region| serde_json::to_string(&region.display).ok())
        .unwrap_or_else(|| "null".to_string())
}

fn lookup(id: &str) -> Result<ElementId, JsValue> {
    ElementId::get(id).ok_or_else(|| js_error(format!("unknown element {id:?}")))
}

fn export_format(name: &str) -> Result<ExportFormat, JsValue> {
    ExportFormat::from_name(name).ok_or_else(|| js_error(format!("unsupported format {name:?}")))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::{Point, Rect, Transform};
    use pretty_assertions::assert_eq;

    #[test]
    fn elements_json_shape() {
        let mut surface = Surface::new(SurfaceConfig::sized(50, 50));
        surface.attach().unwrap();
        surface.add_text_element();
        surface.place_element(0, Transform::upright(Rect::new(1.0, 2.0, 3.0, 4.0)));

        let json: serde_json::Value = serde_json::from_str(&elements_json(&surface)).unwrap();
        let view = &json[0];
        assert_eq!(view["kind"], "text");
        assert_eq!(view["content"], "Text");
        assert_eq!(view["isGizmoVisible"], true);
        assert_eq!(view["transform"]["rect"]["left"], 1.0);
        assert_eq!(view["transform"]["scaleParams"]["scaleX"], 1.0);
        assert!(view.get("source").is_none());
    }

    #[test]
    fn selection_json_is_null_without_marquee() {
        let mut surface = Surface::new(SurfaceConfig::sized(50, 50));
        surface.attach().unwrap();
        assert_eq!(selection_json(&surface), "null");

        let frame = SurfaceFrame::at(Point::ZERO);
        surface.handle(&InputEvent::pointer_down(10.0, 10.0, frame));
        surface.handle(&InputEvent::pointer_move(5.0, 20.0, frame));
        let json: serde_json::Value = serde_json::from_str(&selection_json(&surface)).unwrap();
        assert_eq!(json["rect"]["left"], 5.0);
        assert_eq!(json["scaleParams"]["scaleX"], -1.0);
    }

    #[test]
    fn handle_key_reports_action_and_tool() {
        let mut canvas = BakeCanvas::new(10, 10).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&canvas.handle_key("t", false, false, false, false)).unwrap();
        assert_eq!(json["action"], "tool_text");
        assert_eq!(json["tool"], "text");
        assert_eq!(json["changed"], true);
    }
}
