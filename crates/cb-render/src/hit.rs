//! Hit testing: surface point → floating element or resize handle.
//!
//! Elements are painted in list order, so the last one is topmost and is
//! tested first. The selected element's resize handle sits above every
//! element body.

use cb_core::{Element, ElementId, Point, Rect};

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// The bottom-right resize handle of the element at this index.
    Handle(usize),
    /// The body of the element at this index.
    Body(usize),
    /// Empty surface.
    Empty,
}

/// Find what is under surface point `p`.
///
/// `handle_owner` is the element whose gizmo handle is live (the selected,
/// resizable element), if any. The handle is a `handle_size` square
/// centred on that element's bottom-right corner.
pub fn hit_test(
    elements: &[Element],
    handle_owner: Option<ElementId>,
    p: Point,
    handle_size: f64,
) -> Hit {
    if let Some(owner) = handle_owner
        && let Some(index) = elements.iter().position(|e| e.id == owner)
        && let Some(placement) = elements[index].placement()
        && handle_rect(&placement.rect, handle_size).contains(p)
    {
        return Hit::Handle(index);
    }

    elements
        .iter()
        .enumerate()
        .rev()
        .find(|(_, e)| e.placement().is_some_and(|t| t.rect.contains(p)))
        .map_or(Hit::Empty, |(i, _)| Hit::Body(i))
}

/// The resize handle square of an element occupying `rect`.
pub fn handle_rect(rect: &Rect, handle_size: f64) -> Rect {
    let r = rect.normalized();
    let half = handle_size / 2.0;
    Rect::new(r.right() - half, r.bottom() - half, handle_size, handle_size)
}
