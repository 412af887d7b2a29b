//! Tool system for surface interactions.
//!
//! The active tool decides what a pointer-down means. Tools are stateless:
//! they turn a [`Hit`] into a [`PointerIntent`], and the
//! [`Surface`](crate::surface::Surface) carries the intent out.
//!
//! | Tool   | Element body | Resize handle | Empty surface   |
//! |--------|--------------|---------------|-----------------|
//! | Select | drag         | resize        | start selection |
//! | Move   | drag         | resize        | nothing         |
//! | Text   | place text   | place text    | place text      |

use crate::transform::TransformAction;
use cb_render::Hit;

/// The active tool determines how pointer-downs are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolKind {
    #[default]
    Select,
    Move,
    Text,
}

/// What a pointer-down should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerIntent {
    /// Begin a transform session on the element at `index`.
    Transform {
        index: usize,
        action: TransformAction,
    },
    /// Clear the element selection and begin a marquee selection.
    Select,
    /// Add a text element under the pointer and drag it.
    PlaceText,
    Ignore,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Move => "move",
            Self::Text => "text",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "select" => Some(Self::Select),
            "move" => Some(Self::Move),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Whether elements may be dragged and resized with this tool.
    pub fn permits_manipulation(&self) -> bool {
        matches!(self, Self::Select | Self::Move)
    }

    /// Whether the tool hands back to Select once its gesture ends.
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Self::Text)
    }

    pub fn intent(&self, hit: Hit) -> PointerIntent {
        match (self, hit) {
            (Self::Text, _) => PointerIntent::PlaceText,
            (_, Hit::Handle(index)) => PointerIntent::Transform {
                index,
                action: TransformAction::Resize,
            },
            (_, Hit::Body(index)) => PointerIntent::Transform {
                index,
                action: TransformAction::Drag,
            },
            (Self::Select, Hit::Empty) => PointerIntent::Select,
            (Self::Move, Hit::Empty) => PointerIntent::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn select_tool_intents() {
        assert_eq!(
            ToolKind::Select.intent(Hit::Handle(2)),
            PointerIntent::Transform {
                index: 2,
                action: TransformAction::Resize
            }
        );
        assert_eq!(
            ToolKind::Select.intent(Hit::Body(0)),
            PointerIntent::Transform {
                index: 0,
                action: TransformAction::Drag
            }
        );
        assert_eq!(ToolKind::Select.intent(Hit::Empty), PointerIntent::Select);
    }

    #[test]
    fn move_tool_ignores_empty_surface() {
        assert_eq!(ToolKind::Move.intent(Hit::Empty), PointerIntent::Ignore);
        assert!(ToolKind::Move.permits_manipulation());
    }

    #[test]
    fn text_tool_always_places_text() {
        assert_eq!(ToolKind::Text.intent(Hit::Body(1)), PointerIntent::PlaceText);
        assert_eq!(ToolKind::Text.intent(Hit::Empty), PointerIntent::PlaceText);
        assert!(!ToolKind::Text.permits_manipulation());
        assert!(ToolKind::Text.is_one_shot());
    }

    #[test]
    fn names_roundtrip() {
        for tool in [ToolKind::Select, ToolKind::Move, ToolKind::Text] {
            assert_eq!(ToolKind::from_name(tool.name()), Some(tool));
        }
        assert_eq!(ToolKind::from_name("pen"), None);
    }
}
