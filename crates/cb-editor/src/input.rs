//! Input abstraction layer.
//!
//! Normalizes host pointer and keyboard events into an `InputEvent` enum
//! consumed by the [`Surface`](crate::surface::Surface). Pointer positions
//! stay in screen space; each event carries the [`SurfaceFrame`] measured
//! when it fired so the surface can map it itself.

use cb_core::{Point, SurfaceFrame};

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown {
        x: f64,
        y: f64,
        frame: SurfaceFrame,
        modifiers: Modifiers,
    },

    /// Pointer moved.
    PointerMove {
        x: f64,
        y: f64,
        frame: SurfaceFrame,
        modifiers: Modifiers,
    },

    /// Pointer released.
    PointerUp {
        x: f64,
        y: f64,
        frame: SurfaceFrame,
        modifiers: Modifiers,
    },

    /// Key pressed. `key` is the `KeyboardEvent.key` value.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, frame: SurfaceFrame) -> Self {
        Self::PointerDown {
            x,
            y,
            frame,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f64, y: f64, frame: SurfaceFrame) -> Self {
        Self::PointerMove {
            x,
            y,
            frame,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64, frame: SurfaceFrame) -> Self {
        Self::PointerUp {
            x,
            y,
            frame,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.into(),
            modifiers,
        }
    }

    /// Screen position and frame, if this is a pointer event.
    pub fn pointer(&self) -> Option<(Point, SurfaceFrame)> {
        match self {
            Self::PointerDown { x, y, frame, .. }
            | Self::PointerMove { x, y, frame, .. }
            | Self::PointerUp { x, y, frame, .. } => Some((Point::new(*x, *y), *frame)),
            Self::Key { .. } => None,
        }
    }

    /// Surface-space position, if this is a pointer event.
    pub fn surface_position(&self) -> Option<Point> {
        self.pointer().map(|(p, frame)| frame.to_surface(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn surface_position_uses_event_frame() {
        let frame = SurfaceFrame::at(Point::new(100.0, 50.0));
        let e = InputEvent::pointer_move(130.0, 60.0, frame);
        assert_eq!(e.surface_position(), Some(Point::new(30.0, 10.0)));
        assert_eq!(InputEvent::key("z", Modifiers::NONE).pointer(), None);
    }

    #[test]
    fn command_modifier_is_ctrl_or_meta() {
        assert!(Modifiers { ctrl: true, ..Modifiers::NONE }.command());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.command());
        assert!(!Modifiers { shift: true, ..Modifiers::NONE }.command());
    }
}
