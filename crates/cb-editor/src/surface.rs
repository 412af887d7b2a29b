//! Interaction coordinator: one editable surface.
//!
//! A `Surface` owns the raster and its history, the list of floating
//! elements, the element selection, and the erase selection region. Pointer
//! and key events arrive as [`InputEvent`]s and drive a small state machine:
//!
//! ```text
//! Idle ──down on element──▶ Transforming ──up──▶ Idle
//! Idle ──down on empty────▶ Selecting    ──up──▶ Idle
//! ```
//!
//! Moves recompute the live transform (or marquee) from the session's
//! pre-transform. Keys are only honoured while idle. Every raster write
//! caused by one command (bake, erase) is followed by exactly one history
//! snapshot; a command that writes nothing records nothing.

use crate::history::History;
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{PointerIntent, ToolKind};
use crate::transform::{TransformAction, TransformSession};
use cb_core::{
    Bitmap, Drawable, Element, ElementId, IdCounter, ImageState, Point, Raster, RasterError,
    RasterSnapshot, Rect, SurfaceConfig, SurfaceFrame, TextStyle, Transform,
};
use cb_render::{
    Compositor, ExportFormat, FontGlyphs, GlyphSource, decode_bitmap, encode_raster, erase_region,
    hit_test, to_data_url,
};
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::Arc;

/// Coarse interaction state, for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Selecting,
    Transforming,
}

#[derive(Debug, Clone, Copy)]
enum Interaction {
    Idle,
    Selecting(TransformSession),
    Transforming {
        id: ElementId,
        session: TransformSession,
    },
}

/// The marquee drawn with the Select tool: the erase target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRegion {
    /// Surface point where the marquee started.
    pub anchor: Point,
    /// Signed pointer delta from the anchor.
    pub delta: (f64, f64),
    /// Normalized marquee for display, with its flip state.
    pub display: Transform,
}

impl SelectionRegion {
    fn from_session(session: &TransformSession) -> Self {
        Self {
            anchor: session.start_surface(),
            delta: session.delta(),
            display: session.current(),
        }
    }

    /// The raw, start-relative rectangle the erase clears.
    pub fn erase_rect(&self) -> Rect {
        Rect::from_origin_size(self.anchor, self.delta.0, self.delta.1)
    }
}

/// Per-element state exposed to the render layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementView {
    pub id: ElementId,
    pub index: usize,
    pub kind: &'static str,
    /// `None` while an image has neither pixels nor an explicit placement.
    pub transform: Option<Transform>,
    pub is_gizmo_visible: bool,
    pub is_resizable: bool,
    pub is_draggable: bool,
    /// `loading`, `loaded`, `failed` for images; `ready` for text.
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Raster plus the history of its snapshots. Exists once attached.
#[derive(Debug)]
struct Backing {
    raster: Raster,
    history: History<RasterSnapshot>,
}

/// One editable surface.
#[derive(Debug)]
pub struct Surface {
    config: SurfaceConfig,
    backing: Option<Backing>,
    elements: Vec<Element>,
    ids: IdCounter,
    /// Element whose gizmo is shown.
    selected: Option<ElementId>,
    selection: Option<SelectionRegion>,
    interaction: Interaction,
    tool: ToolKind,
    compositor: Compositor,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl Surface {
    /// A detached surface. Bakes and erases are no-ops until [`attach`](Self::attach).
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            backing: None,
            elements: Vec::new(),
            ids: IdCounter::default(),
            selected: None,
            selection: None,
            interaction: Interaction::Idle,
            tool: ToolKind::default(),
            compositor: Compositor::default(),
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Create a blank raster of the configured size and start history
    /// from it. Fails when the configured size cannot be allocated.
    pub fn attach(&mut self) -> Result<(), RasterError> {
        let raster = Raster::new(self.config.width, self.config.height)?;
        self.attach_raster(raster);
        Ok(())
    }

    /// Adopt `raster` as the surface's pixels. Any previous history is
    /// forgotten.
    pub fn attach_raster(&mut self, raster: Raster) {
        let snapshot = raster.snapshot();
        log::debug!("ATTACH {}x{}", raster.width(), raster.height());
        match &mut self.backing {
            Some(backing) => {
                backing.raster = raster;
                backing.history.reset(snapshot);
            }
            None => {
                self.backing = Some(Backing {
                    raster,
                    history: History::with_depth(snapshot, self.config.history_depth),
                });
            }
        }
    }

    pub fn detach(&mut self) {
        self.backing = None;
        self.interaction = Interaction::Idle;
        self.selection = None;
    }

    pub fn is_attached(&self) -> bool {
        self.backing.is_some()
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.backing.as_ref().map(|b| &b.raster)
    }

    pub fn history(&self) -> Option<&History<RasterSnapshot>> {
        self.backing.as_ref().map(|b| &b.history)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.index_of(id))
    }

    pub fn selection(&self) -> Option<&SelectionRegion> {
        self.selection.as_ref()
    }

    pub fn state(&self) -> InteractionState {
        match self.interaction {
            Interaction::Idle => InteractionState::Idle,
            Interaction::Selecting(_) => InteractionState::Selecting,
            Interaction::Transforming { .. } => InteractionState::Transforming,
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Returns `true` if the tool changed.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        if self.tool == tool {
            return false;
        }
        log::debug!("TOOL {} -> {}", self.tool.name(), tool.name());
        self.tool = tool;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history().is_some_and(History::can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.history().is_some_and(History::can_redo)
    }

    /// Render-layer view of every floating element, bottom to top.
    pub fn element_views(&self) -> Vec<ElementView> {
        let permits = self.tool.permits_manipulation();
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let gizmo = self.selected == Some(element.id);
                let (state, content, source) = match &element.drawable {
                    Drawable::Image { source, state } => {
                        let name = match state {
                            ImageState::Loading => "loading",
                            ImageState::Loaded(_) => "loaded",
                            ImageState::Failed => "failed",
                        };
                        (name, None, Some(source.clone()))
                    }
                    Drawable::Text { content, .. } => ("ready", Some(content.clone()), None),
                };
                ElementView {
                    id: element.id,
                    index,
                    kind: element.drawable.kind_name(),
                    transform: element.placement(),
                    is_gizmo_visible: gizmo,
                    is_resizable: gizmo && permits,
                    is_draggable: permits,
                    state,
                    content,
                    source,
                }
            })
            .collect()
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// Feed one input event. Returns `true` if anything visible changed.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, frame, .. } => {
                self.pointer_down(Point::new(*x, *y), *frame)
            }
            InputEvent::PointerMove { x, y, frame, .. } => {
                self.pointer_move(Point::new(*x, *y), *frame)
            }
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Key { key, modifiers } => ShortcutMap::resolve_with(key, *modifiers)
                .is_some_and(|action| self.dispatch(action)),
        }
    }

    /// Run a shortcut action. Ignored while a gesture is in progress.
    pub fn dispatch(&mut self, action: ShortcutAction) -> bool {
        if !matches!(self.interaction, Interaction::Idle) {
            log::debug!("key {} ignored during gesture", action.name());
            return false;
        }
        match action {
            ShortcutAction::ToolSelect => self.set_tool(ToolKind::Select),
            ShortcutAction::ToolMove => self.set_tool(ToolKind::Move),
            ShortcutAction::ToolText => self.set_tool(ToolKind::Text),
            ShortcutAction::Commit => self.bake_selected(),
            ShortcutAction::CommitAll => self.bake_all(),
            ShortcutAction::Erase => {
                if self.selection.is_some() {
                    self.erase_selection()
                } else {
                    self.selected_index()
                        .is_some_and(|index| self.remove_element(index))
                }
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Deselect => self.deselect(),
        }
    }

    fn pointer_down(&mut self, screen: Point, frame: SurfaceFrame) -> bool {
        if !matches!(self.interaction, Interaction::Idle) {
            return false;
        }
        let p = frame.to_surface(screen);
        let handle_owner = self
            .selected
            .filter(|_| self.tool.permits_manipulation());
        let hit = hit_test(&self.elements, handle_owner, p, self.config.handle_size);
        log::trace!("DOWN {p:?} tool={} hit={hit:?}", self.tool.name());

        match self.tool.intent(hit) {
            PointerIntent::Transform { index, action } => {
                self.begin_transform(index, action, screen, frame)
            }
            PointerIntent::Select => {
                self.selected = None;
                let session = TransformSession::marquee(screen, frame);
                self.selection = Some(SelectionRegion::from_session(&session));
                self.interaction = Interaction::Selecting(session);
                true
            }
            PointerIntent::PlaceText => {
                let content = self.config.default_text.clone();
                let id = self.insert_text(content, p);
                self.index_of(id).is_some_and(|index| {
                    self.begin_transform(index, TransformAction::Drag, screen, frame)
                })
            }
            PointerIntent::Ignore => false,
        }
    }

    fn begin_transform(
        &mut self,
        index: usize,
        action: TransformAction,
        screen: Point,
        frame: SurfaceFrame,
    ) -> bool {
        let Some(element) = self.elements.get(index) else {
            return false;
        };
        let Some(pre) = element.placement() else {
            return false;
        };
        let id = element.id;

        // A transform session and a visible selection never coexist.
        self.selection = None;
        self.selected = Some(id);
        self.interaction = Interaction::Transforming {
            id,
            session: TransformSession::begin(action, screen, frame, pre),
        };
        log::debug!("BEGIN {action:?} {id} from {pre:?}");
        true
    }

    fn pointer_move(&mut self, screen: Point, frame: SurfaceFrame) -> bool {
        match &mut self.interaction {
            Interaction::Idle => false,
            Interaction::Selecting(session) => {
                session.update(screen, frame);
                self.selection = Some(SelectionRegion::from_session(session));
                true
            }
            Interaction::Transforming { id, session } => {
                session.update(screen, frame);
                let transform = session.current();
                log::trace!("MOVE {id} {transform:?}");
                match self.elements.iter_mut().find(|e| e.id == *id) {
                    Some(element) => {
                        element.set_transform(transform);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Release commits whatever the last move computed.
    fn pointer_up(&mut self) -> bool {
        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::Idle => false,
            Interaction::Selecting(_) => {
                log::debug!("SELECT {:?}", self.selection);
                true
            }
            Interaction::Transforming { id, .. } => {
                log::debug!(
                    "COMMIT {id} {:?}",
                    self.index_of(id).and_then(|i| self.elements[i].placement())
                );
                if self.tool.is_one_shot() {
                    self.set_tool(ToolKind::Select);
                }
                true
            }
        }
    }

    /// Hide the gizmo and the selection region.
    pub fn deselect(&mut self) -> bool {
        let changed = self.selected.is_some() || self.selection.is_some();
        self.selected = None;
        self.selection = None;
        changed
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    /// Add an image element at the default position. Its pixels arrive
    /// later through [`attach_bitmap`](Self::attach_bitmap) or
    /// [`load_image_bytes`](Self::load_image_bytes).
    pub fn add_image_element(&mut self, source: impl Into<String>) -> ElementId {
        let element = self.new_element(Drawable::image(source), self.config.default_position);
        self.push_element(element)
    }

    /// Add a text element with the default content at the default position.
    pub fn add_text_element(&mut self) -> ElementId {
        let content = self.config.default_text.clone();
        self.insert_text(content, self.config.default_position)
    }

    fn insert_text(&mut self, content: String, at: Point) -> ElementId {
        let style = self.config.text_style;
        let (w, h) = self.text_size(&content, &style);
        let mut element = self.new_element(Drawable::text(content, style), at);
        element.set_transform(Transform::upright(Rect::from_origin_size(at, w, h)));
        self.push_element(element)
    }

    fn new_element(&mut self, drawable: Drawable, at: Point) -> Element {
        let id = self.ids.next(drawable.kind_name());
        Element::new(id, drawable, at)
    }

    fn push_element(&mut self, element: Element) -> ElementId {
        let id = element.id;
        log::debug!("ADD {id} at {:?}", element.offset);
        self.elements.push(element);
        self.selected = Some(id);
        id
    }

    /// Deliver decoded pixels for an image element.
    pub fn attach_bitmap(&mut self, id: ElementId, bitmap: Bitmap) -> bool {
        self.set_image_state(id, ImageState::Loaded(Arc::new(bitmap)))
    }

    /// Mark an image element as undecodable. It stays in the list.
    pub fn mark_image_failed(&mut self, id: ElementId) -> bool {
        self.set_image_state(id, ImageState::Failed)
    }

    /// Decode encoded image bytes and attach them. A decode failure marks
    /// the element failed and is returned to the caller.
    pub fn load_image_bytes(&mut self, id: ElementId, bytes: &[u8]) -> Result<(), RasterError> {
        match decode_bitmap(bytes) {
            Ok(bitmap) => {
                self.attach_bitmap(id, bitmap);
                Ok(())
            }
            Err(e) => {
                log::warn!("image {id} failed to decode: {e}");
                self.mark_image_failed(id);
                Err(e)
            }
        }
    }

    fn set_image_state(&mut self, id: ElementId, new_state: ImageState) -> bool {
        let Some(element) = self.elements.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        match &mut element.drawable {
            Drawable::Image { state, .. } => {
                *state = new_state;
                true
            }
            Drawable::Text { .. } => false,
        }
    }

    /// Drop a floating element without baking it. No history entry.
    pub fn remove_element(&mut self, index: usize) -> bool {
        if index >= self.elements.len() {
            return false;
        }
        let element = self.elements.remove(index);
        if self.selected == Some(element.id) {
            self.selected = None;
        }
        if matches!(self.interaction, Interaction::Transforming { id, .. } if id == element.id) {
            self.interaction = Interaction::Idle;
        }
        log::debug!("REMOVE {}", element.id);
        true
    }

    /// Replace a text element's content. Its box is re-measured; position
    /// and mirroring are kept.
    pub fn change_text(&mut self, index: usize, new_content: impl Into<String>) -> bool {
        let new_content = new_content.into();
        let Some(element) = self.elements.get(index) else {
            return false;
        };
        let Drawable::Text { style, .. } = &element.drawable else {
            return false;
        };
        let (w, h) = self.text_size(&new_content, style);

        let element = &mut self.elements[index];
        if let Drawable::Text { content, .. } = &mut element.drawable {
            *content = new_content;
        }
        if let Some(mut transform) = element.placement() {
            transform.rect.width = w;
            transform.rect.height = h;
            element.set_transform(transform);
        }
        true
    }

    /// Place an element explicitly, as if a gesture had committed `transform`.
    pub fn place_element(&mut self, index: usize, transform: Transform) -> bool {
        match self.elements.get_mut(index) {
            Some(element) => {
                element.set_transform(transform);
                true
            }
            None => false,
        }
    }

    /// Text box size from the glyph source, or an estimate from the font
    /// size when no font is loaded.
    fn text_size(&self, content: &str, style: &TextStyle) -> (f64, f64) {
        self.compositor
            .glyphs()
            .measure(content, style)
            .unwrap_or_else(|| {
                let size = style.size as f64;
                let columns = content.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                let rows = content.lines().count().max(1);
                (columns.max(1) as f64 * size * 0.6, rows as f64 * size * 1.2)
            })
    }

    // ─── Fonts ───────────────────────────────────────────────────────────

    /// Swap the glyph source and re-measure every text element.
    pub fn set_glyphs(&mut self, glyphs: Box<dyn GlyphSource>) {
        self.compositor.set_glyphs(glyphs);
        let texts: Vec<(usize, String)> = self
            .elements
            .iter()
            .enumerate()
            .filter_map(|(index, e)| match &e.drawable {
                Drawable::Text { content, .. } => Some((index, content.clone())),
                Drawable::Image { .. } => None,
            })
            .collect();
        for (index, content) in texts {
            self.change_text(index, content);
        }
    }

    /// Load TTF/OTF bytes as the text font.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> Result<(), RasterError> {
        let glyphs = FontGlyphs::from_bytes(bytes)?;
        self.set_glyphs(Box::new(glyphs));
        Ok(())
    }

    // ─── Raster commands ─────────────────────────────────────────────────

    /// Bake the element at `index` into the raster.
    pub fn bake_element(&mut self, index: usize) -> bool {
        self.bake_indices(SmallVec::from_slice(&[index]))
    }

    /// Bake the element whose gizmo is shown.
    pub fn bake_selected(&mut self) -> bool {
        match self.selected_index() {
            Some(index) => self.bake_element(index),
            None => false,
        }
    }

    /// Bake every floating element, bottom to top, as one history step.
    pub fn bake_all(&mut self) -> bool {
        self.bake_indices((0..self.elements.len()).collect())
    }

    /// Bake `indices`, discard the consumed elements, and snapshot once.
    /// Elements that cannot be drawn yet (unloaded images, text without a
    /// font) are left floating.
    fn bake_indices(&mut self, mut indices: SmallVec<[usize; 4]>) -> bool {
        let Some(backing) = self.backing.as_mut() else {
            log::warn!("bake ignored: surface not attached");
            return false;
        };
        indices.sort_unstable();
        indices.dedup();

        let consumed: SmallVec<[usize; 4]> = indices
            .into_iter()
            .filter(|&index| {
                self.elements
                    .get(index)
                    .is_some_and(|e| self.compositor.bake_element(e, &mut backing.raster))
            })
            .collect();
        if consumed.is_empty() {
            return false;
        }

        backing.history.set(backing.raster.snapshot());
        for &index in consumed.iter().rev() {
            let element = self.elements.remove(index);
            if self.selected == Some(element.id) {
                self.selected = None;
            }
            log::debug!("BAKED {}", element.id);
        }
        true
    }

    /// Clear the selection region's raw rectangle. The region is consumed
    /// either way.
    pub fn erase_selection(&mut self) -> bool {
        let Some(region) = self.selection.take() else {
            return false;
        };
        let Some(backing) = self.backing.as_mut() else {
            log::warn!("erase ignored: surface not attached");
            return false;
        };
        if !erase_region(&region.erase_rect(), &mut backing.raster) {
            return false;
        }
        backing.history.set(backing.raster.snapshot());
        true
    }

    /// Restore the previous raster snapshot. Floating elements are untouched.
    pub fn undo(&mut self) -> bool {
        let Some(backing) = self.backing.as_mut() else {
            return false;
        };
        let Some(snapshot) = backing.history.undo() else {
            return false;
        };
        backing.raster.restore(snapshot);
        log::debug!("UNDO ({} left)", backing.history.undo_len());
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(backing) = self.backing.as_mut() else {
            return false;
        };
        let Some(snapshot) = backing.history.redo() else {
            return false;
        };
        backing.raster.restore(snapshot);
        log::debug!("REDO ({} left)", backing.history.redo_len());
        true
    }

    /// The raster with every floating element drawn over it at its live
    /// placement, for display. History and the raster itself are untouched.
    pub fn preview(&self) -> Option<Raster> {
        let mut frame = self.raster()?.clone();
        for element in &self.elements {
            self.compositor.bake_element(element, &mut frame);
        }
        Some(frame)
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Encode the raster. Floating elements are not included.
    pub fn export_raster(&self, format: ExportFormat) -> Result<Vec<u8>, RasterError> {
        let raster = self.raster().ok_or(RasterError::Detached)?;
        encode_raster(raster, format)
    }

    pub fn export_data_url(&self, format: ExportFormat) -> Result<String, RasterError> {
        let raster = self.raster().ok_or(RasterError::Detached)?;
        to_data_url(raster, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use cb_core::ScaleParams;
    use pretty_assertions::assert_eq;

    fn frame() -> SurfaceFrame {
        SurfaceFrame::default()
    }

    fn surface() -> Surface {
        let mut s = Surface::new(SurfaceConfig::sized(200, 200));
        s.attach().unwrap();
        s
    }

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Bitmap {
        Bitmap::new(w, h, rgba.repeat((w * h) as usize)).unwrap()
    }

    fn drag(s: &mut Surface, from: (f64, f64), to: (f64, f64)) {
        s.handle(&InputEvent::pointer_down(from.0, from.1, frame()));
        s.handle(&InputEvent::pointer_move(to.0, to.1, frame()));
        s.handle(&InputEvent::pointer_up(to.0, to.1, frame()));
    }

    fn key(s: &mut Surface, k: &str) -> bool {
        s.handle(&InputEvent::key(k, Modifiers::NONE))
    }

    #[test]
    fn dragging_an_image_moves_it() {
        let mut s = surface();
        let id = s.add_image_element("a.png");
        s.attach_bitmap(id, solid(20, 10, [255, 0, 0, 255]));

        drag(&mut s, (5.0, 5.0), (35.0, 45.0));
        assert_eq!(
            s.element(0).unwrap().transform,
            Some(Transform::upright(Rect::new(30.0, 40.0, 20.0, 10.0)))
        );
        assert_eq!(s.state(), InteractionState::Idle);
    }

    #[test]
    fn handle_drag_resizes_and_flips() {
        let mut s = surface();
        let id = s.add_image_element("a.png");
        s.attach_bitmap(id, solid(4, 4, [0, 0, 0, 255]));
        s.place_element(0, Transform::upright(Rect::new(100.0, 100.0, 50.0, 50.0)));

        drag(&mut s, (150.0, 150.0), (70.0, 160.0));
        assert_eq!(
            s.element(0).unwrap().transform,
            Some(Transform::new(
                Rect::new(70.0, 100.0, 30.0, 60.0),
                ScaleParams::new(-1.0, 1.0)
            ))
        );
    }

    #[test]
    fn unselected_element_has_no_live_handle() {
        let mut s = surface();
        let id = s.add_image_element("a.png");
        s.attach_bitmap(id, solid(4, 4, [0, 0, 0, 255]));
        s.place_element(0, Transform::upright(Rect::new(10.0, 10.0, 50.0, 50.0)));
        s.deselect();

        // Bottom-right corner: a body drag, not a resize.
        drag(&mut s, (59.0, 59.0), (69.0, 69.0));
        assert_eq!(
            s.element(0).unwrap().transform.unwrap().rect,
            Rect::new(20.0, 20.0, 50.0, 50.0)
        );
    }

    #[test]
    fn release_commits_last_move_not_release_point() {
        let mut s = surface();
        s.add_text_element();
        let pre = s.element(0).unwrap().transform.unwrap();

        s.handle(&InputEvent::pointer_down(1.0, 1.0, frame()));
        s.handle(&InputEvent::pointer_move(11.0, 1.0, frame()));
        s.handle(&InputEvent::pointer_up(90.0, 90.0, frame()));
        assert_eq!(
            s.element(0).unwrap().transform.unwrap().rect.left,
            pre.rect.left + 10.0
        );
    }

    #[test]
    fn starting_a_transform_hides_the_selection() {
        let mut s = surface();
        s.add_text_element();
        s.place_element(0, Transform::upright(Rect::new(0.0, 0.0, 20.0, 20.0)));

        drag(&mut s, (100.0, 100.0), (150.0, 150.0));
        assert!(s.selection().is_some());
        assert_eq!(s.selected(), None);

        s.handle(&InputEvent::pointer_down(5.0, 5.0, frame()));
        assert_eq!(s.selection(), None);
        assert_eq!(s.state(), InteractionState::Transforming);
    }

    #[test]
    fn move_tool_ignores_empty_surface() {
        let mut s = surface();
        s.set_tool(ToolKind::Move);
        assert!(!s.handle(&InputEvent::pointer_down(100.0, 100.0, frame())));
        assert_eq!(s.state(), InteractionState::Idle);
    }

    #[test]
    fn text_tool_places_then_returns_to_select() {
        let mut s = surface();
        s.set_tool(ToolKind::Text);
        drag(&mut s, (40.0, 40.0), (50.0, 60.0));

        assert_eq!(s.elements().len(), 1);
        let rect = s.element(0).unwrap().transform.unwrap().rect;
        assert_eq!((rect.left, rect.top), (50.0, 60.0));
        assert_eq!(s.tool(), ToolKind::Select);
    }

    #[test]
    fn keys_are_ignored_mid_gesture() {
        let mut s = surface();
        s.add_text_element();
        s.handle(&InputEvent::pointer_down(1.0, 1.0, frame()));
        assert!(!key(&mut s, "Delete"));
        assert_eq!(s.elements().len(), 1);
    }

    #[test]
    fn delete_without_selection_removes_element() {
        let mut s = surface();
        s.add_text_element();
        assert!(key(&mut s, "Delete"));
        assert!(s.elements().is_empty());
        assert!(!s.can_undo());
    }

    #[test]
    fn escape_hides_gizmo() {
        let mut s = surface();
        s.add_text_element();
        assert!(s.element_views()[0].is_gizmo_visible);
        assert!(key(&mut s, "Escape"));
        let view = &s.element_views()[0];
        assert!(!view.is_gizmo_visible);
        assert!(!view.is_resizable);
        assert!(view.is_draggable);
    }

    #[test]
    fn element_views_follow_tool_and_load_state() {
        let mut s = surface();
        let id = s.add_image_element("blob:x");
        assert_eq!(s.element_views()[0].state, "loading");
        assert_eq!(s.element_views()[0].transform, None);

        s.mark_image_failed(id);
        assert_eq!(s.element_views()[0].state, "failed");

        s.set_tool(ToolKind::Text);
        let view = &s.element_views()[0];
        assert!(view.is_gizmo_visible);
        assert!(!view.is_resizable);
        assert!(!view.is_draggable);
    }

    #[test]
    fn change_text_remeasures_and_keeps_position() {
        let mut s = surface();
        s.set_glyphs(Box::new(cb_render::BlockGlyphs::default()));
        s.add_text_element();
        s.place_element(
            0,
            Transform::new(Rect::new(5.0, 6.0, 1.0, 1.0), ScaleParams::new(-1.0, 1.0)),
        );

        assert!(s.change_text(0, "abc"));
        let t = s.element(0).unwrap().transform.unwrap();
        assert_eq!(t.rect, Rect::new(5.0, 6.0, 24.0, 10.0));
        assert_eq!(t.scale_params, ScaleParams::new(-1.0, 1.0));
    }

    #[test]
    fn detached_surface_ignores_raster_commands() {
        let mut s = Surface::new(SurfaceConfig::sized(10, 10));
        let id = s.add_image_element("a");
        s.attach_bitmap(id, solid(2, 2, [1, 2, 3, 255]));
        assert!(!s.bake_all());
        assert!(!s.undo());
        assert_eq!(s.elements().len(), 1);
        assert!(matches!(
            s.export_raster(ExportFormat::Png),
            Err(RasterError::Detached)
        ));
    }

    #[test]
    fn preview_draws_floating_elements_without_baking() {
        let mut s = surface();
        let id = s.add_image_element("a.png");
        s.attach_bitmap(id, solid(2, 2, [9, 9, 9, 255]));

        let preview = s.preview().unwrap();
        assert_eq!(preview.pixel(1, 1), Some([9, 9, 9, 255]));
        assert_eq!(s.raster().unwrap().pixel(1, 1), Some([0, 0, 0, 0]));
        assert!(!s.can_undo());
        assert_eq!(s.elements().len(), 1);
    }

    #[test]
    fn bad_image_bytes_mark_element_failed() {
        let mut s = surface();
        let id = s.add_image_element("broken");
        assert!(s.load_image_bytes(id, b"nope").is_err());
        assert_eq!(s.element_views()[0].state, "failed");
        assert!(!s.bake_element(0));
        assert_eq!(s.elements().len(), 1);
    }

    #[test]
    fn added_text_takes_configured_style() {
        let mut config = SurfaceConfig::sized(50, 50);
        config.text_style = TextStyle {
            size: 12.0,
            color: cb_core::Color::rgba(0, 128, 255, 255),
        };
        let mut s = Surface::new(config);
        s.add_text_element();
        s.add_text_element();

        for element in s.elements() {
            let Drawable::Text { style, .. } = &element.drawable else {
                panic!("expected text");
            };
            assert_eq!(*style, s.config().text_style);
        }
        // 4 columns of "Text" at 0.6 × 12px, one 1.2 × 12px line.
        let rect = s.element(0).unwrap().transform.unwrap().rect;
        assert!((rect.width - 28.8).abs() < 1e-9, "got {}", rect.width);
        assert!((rect.height - 14.4).abs() < 1e-9, "got {}", rect.height);
    }

    #[test]
    fn element_ids_count_per_surface() {
        let mut a = Surface::new(SurfaceConfig::sized(10, 10));
        let mut b = Surface::new(SurfaceConfig::sized(10, 10));
        let first = a.add_image_element("a.png");
        let second = a.add_text_element();
        assert_eq!(first.as_str(), "image_0");
        assert_eq!(second.as_str(), "text_1");
        assert_eq!(b.add_image_element("b.png"), first);
    }

    #[test]
    fn oversized_surface_fails_to_attach() {
        let mut s = Surface::new(SurfaceConfig::sized(u32::MAX, u32::MAX));
        let err = s.attach().unwrap_err();
        assert!(matches!(err, RasterError::TooLarge { .. }));
        assert!(!s.is_attached());
        assert!(!s.bake_all());
    }
}
