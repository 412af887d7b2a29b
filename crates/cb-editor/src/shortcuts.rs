//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the browser bridge and native tests resolve keys the same way.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolSelect,
    ToolMove,
    ToolText,

    // ── Edit ──
    /// Bake the selected element into the raster.
    Commit,
    /// Bake every floating element.
    CommitAll,
    /// Clear the selection region, or drop the selected element when no
    /// region is visible.
    Erase,
    Undo,
    Redo,

    // ── UI ──
    Deselect,
}

impl ShortcutAction {
    /// Stable name reported to the host.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToolSelect => "tool_select",
            Self::ToolMove => "tool_move",
            Self::ToolText => "tool_text",
            Self::Commit => "commit",
            Self::CommitAll => "commit_all",
            Self::Erase => "erase",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Deselect => "deselect",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        Self::resolve_with(
            key,
            Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        )
    }

    /// [`resolve`](Self::resolve) with a [`Modifiers`] bundle.
    pub fn resolve_with(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();
        let shift = modifiers.shift;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "Enter" => Some(ShortcutAction::CommitAll),
                _ => None,
            };
        }

        // ── Single keys ──
        match key {
            "Enter" => Some(ShortcutAction::Commit),
            "Delete" | "Backspace" => Some(ShortcutAction::Erase),
            "Escape" => Some(ShortcutAction::Deselect),
            _ if shift => None,
            "v" | "V" => Some(ShortcutAction::ToolSelect),
            "m" | "M" => Some(ShortcutAction::ToolMove),
            "t" | "T" => Some(ShortcutAction::ToolText),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_tool_shortcuts() {
        assert_eq!(
            ShortcutMap::resolve("v", false, false, false, false),
            Some(ShortcutAction::ToolSelect)
        );
        assert_eq!(
            ShortcutMap::resolve("m", false, false, false, false),
            Some(ShortcutAction::ToolMove)
        );
        assert_eq!(
            ShortcutMap::resolve("T", false, false, false, false),
            Some(ShortcutAction::ToolText)
        );
    }

    #[test]
    fn resolve_commit_and_erase() {
        assert_eq!(
            ShortcutMap::resolve("Enter", false, false, false, false),
            Some(ShortcutAction::Commit)
        );
        assert_eq!(
            ShortcutMap::resolve("Enter", true, false, false, false),
            Some(ShortcutAction::CommitAll)
        );
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::Erase)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::Erase)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::Deselect)
        );
    }

    #[test]
    fn resolve_undo_redo() {
        // Cmd+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", false, false, false, true),
            Some(ShortcutAction::Undo)
        );
        // Ctrl+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", true, false, false, false),
            Some(ShortcutAction::Undo)
        );
        // Cmd+Shift+Z → Redo
        assert_eq!(
            ShortcutMap::resolve("Z", false, true, false, true),
            Some(ShortcutAction::Redo)
        );
        // Ctrl+Y → Redo
        assert_eq!(
            ShortcutMap::resolve("y", true, false, false, false),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn unbound_keys_resolve_to_none() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("v", true, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("V", false, true, false, false), None);
    }

    #[test]
    fn resolve_with_modifiers() {
        let mods = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            ShortcutMap::resolve_with("z", mods),
            Some(ShortcutAction::Undo)
        );
        let redo = Modifiers {
            shift: true,
            ..mods
        };
        assert_eq!(
            ShortcutMap::resolve_with("Z", redo),
            Some(ShortcutAction::Redo)
        );
        assert_eq!(
            ShortcutMap::resolve_with("Enter", Modifiers { alt: true, ..Modifiers::NONE }),
            Some(ShortcutAction::Commit)
        );
    }
}
