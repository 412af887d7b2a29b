pub mod history;
pub mod input;
pub mod shortcuts;
pub mod surface;
pub mod tools;
pub mod transform;

pub use history::History;
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use surface::{ElementView, InteractionState, SelectionRegion, Surface};
pub use tools::{PointerIntent, ToolKind};
pub use transform::{TransformAction, TransformSession, compute_transform};
