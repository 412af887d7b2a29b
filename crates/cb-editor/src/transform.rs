//! Transform engine: pointer deltas → element placement.
//!
//! A [`TransformSession`] lives from pointer-down to pointer-up. Every
//! intermediate transform is computed from the *pre-transform* captured at
//! pointer-down plus the total pointer delta so far, never from the previous
//! intermediate result, so long gestures do not drift.
//!
//! Deltas are taken in surface space. Both the start and the current
//! pointer position are mapped through the [`SurfaceFrame`] measured when
//! they were observed, which keeps the delta correct when the surface is
//! scrolled or rescaled mid-gesture.
//!
//! ## Flips
//!
//! Dragging an edge past the opposite edge mirrors the element on that
//! axis. The rectangle stays normalized (non-negative size, left/top at the
//! actual top-left corner) and the mirror is recorded in
//! [`ScaleParams`]. Crossing is judged against the pre-transform, so an
//! element that is already mirrored and gets crossed again ends up upright.

use cb_core::{Point, Rect, ScaleParams, SurfaceFrame, Transform};

/// What a gesture does to the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformAction {
    /// Translate; size and mirroring are kept.
    Drag,
    /// Move the bottom-right corner; may flip.
    Resize,
}

/// State of one in-progress gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSession {
    pub action: TransformAction,
    /// Treat every update as a resize regardless of `action`. Used by the
    /// selection marquee, which grows from its anchor.
    pub always_resize: bool,
    /// Screen position at pointer-down.
    pub start_pointer: Point,
    pub start_frame: SurfaceFrame,
    /// Latest screen position.
    pub current_pointer: Point,
    pub current_frame: SurfaceFrame,
    /// Element placement at pointer-down.
    pub pre_transform: Transform,
}

impl TransformSession {
    pub fn begin(
        action: TransformAction,
        pointer: Point,
        frame: SurfaceFrame,
        pre_transform: Transform,
    ) -> Self {
        Self {
            action,
            always_resize: false,
            start_pointer: pointer,
            start_frame: frame,
            current_pointer: pointer,
            current_frame: frame,
            pre_transform,
        }
    }

    /// A marquee session anchored at the pointer: a zero-size rect that
    /// grows (and flips) as the pointer moves.
    pub fn marquee(pointer: Point, frame: SurfaceFrame) -> Self {
        let anchor = frame.to_surface(pointer);
        Self {
            always_resize: true,
            ..Self::begin(
                TransformAction::Drag,
                pointer,
                frame,
                Transform::upright(Rect::from_origin_size(anchor, 0.0, 0.0)),
            )
        }
    }

    /// Record a pointer move with the frame measured for it.
    pub fn update(&mut self, pointer: Point, frame: SurfaceFrame) {
        self.current_pointer = pointer;
        self.current_frame = frame;
    }

    /// Surface-space position of the pointer-down.
    pub fn start_surface(&self) -> Point {
        self.start_frame.to_surface(self.start_pointer)
    }

    /// Total surface-space pointer delta since pointer-down.
    pub fn delta(&self) -> (f64, f64) {
        self.current_frame
            .to_surface(self.current_pointer)
            .delta_from(self.start_surface())
    }

    /// The transform for the latest pointer position.
    pub fn current(&self) -> Transform {
        compute_transform(self.action, self, self.always_resize)
    }
}

/// Compute the element transform for `session`'s latest pointer position.
///
/// `always_resize` forces resize semantics even when `action` is
/// [`TransformAction::Drag`].
pub fn compute_transform(
    action: TransformAction,
    session: &TransformSession,
    always_resize: bool,
) -> Transform {
    let (dx, dy) = session.delta();
    let pre = session.pre_transform;

    if action == TransformAction::Drag && !always_resize {
        let rect = Rect::new(
            pre.rect.left + dx,
            pre.rect.top + dy,
            pre.rect.width,
            pre.rect.height,
        );
        return Transform::new(rect, pre.scale_params);
    }

    let (left, width, flip_x) = resize_axis(pre.rect.left, pre.rect.width, dx);
    let (top, height, flip_y) = resize_axis(pre.rect.top, pre.rect.height, dy);
    Transform::new(
        Rect::new(left, top, width, height),
        pre.scale_params.then(ScaleParams::new(flip_x, flip_y)),
    )
}

/// Move the far edge of `[start, start + size]` by `delta`. Returns the
/// normalized `(start, size)` and `-1.0` if the far edge crossed `start`.
fn resize_axis(start: f64, size: f64, delta: f64) -> (f64, f64, f64) {
    let grown = size + delta;
    if grown < 0.0 {
        (start + grown, -grown, -1.0)
    } else {
        (start, grown, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session(action: TransformAction, pre: Transform) -> TransformSession {
        TransformSession::begin(action, Point::new(0.0, 0.0), SurfaceFrame::default(), pre)
    }

    fn moved(mut s: TransformSession, dx: f64, dy: f64) -> TransformSession {
        s.update(Point::new(dx, dy), SurfaceFrame::default());
        s
    }

    #[test]
    fn drag_translates_and_keeps_size() {
        let pre = Transform::new(
            Rect::new(10.0, 20.0, 30.0, 40.0),
            ScaleParams::new(-1.0, 1.0),
        );
        let s = moved(session(TransformAction::Drag, pre), 5.0, -7.0);
        assert_eq!(
            s.current(),
            Transform::new(Rect::new(15.0, 13.0, 30.0, 40.0), ScaleParams::new(-1.0, 1.0))
        );
    }

    #[test]
    fn resize_without_crossing_grows() {
        let pre = Transform::upright(Rect::new(100.0, 100.0, 50.0, 50.0));
        let s = moved(session(TransformAction::Resize, pre), 20.0, -10.0);
        assert_eq!(
            s.current(),
            Transform::upright(Rect::new(100.0, 100.0, 70.0, 40.0))
        );
    }

    #[test]
    fn resize_past_left_edge_flips_horizontally() {
        let pre = Transform::upright(Rect::new(100.0, 100.0, 50.0, 50.0));
        let s = moved(session(TransformAction::Resize, pre), -80.0, 10.0);
        assert_eq!(
            s.current(),
            Transform::new(Rect::new(70.0, 100.0, 30.0, 60.0), ScaleParams::new(-1.0, 1.0))
        );
    }

    #[test]
    fn axes_flip_independently() {
        let pre = Transform::upright(Rect::new(0.0, 0.0, 10.0, 10.0));
        let s = moved(session(TransformAction::Resize, pre), 5.0, -25.0);
        assert_eq!(
            s.current(),
            Transform::new(Rect::new(0.0, -15.0, 15.0, 15.0), ScaleParams::new(1.0, -1.0))
        );
    }

    #[test]
    fn exact_collapse_is_zero_size_not_flipped() {
        let pre = Transform::upright(Rect::new(0.0, 0.0, 10.0, 10.0));
        let s = moved(session(TransformAction::Resize, pre), -10.0, 0.0);
        assert_eq!(
            s.current(),
            Transform::upright(Rect::new(0.0, 0.0, 0.0, 10.0))
        );
    }

    #[test]
    fn crossing_a_mirrored_element_restores_it() {
        let pre = Transform::new(Rect::new(0.0, 0.0, 10.0, 10.0), ScaleParams::new(-1.0, 1.0));
        let s = moved(session(TransformAction::Resize, pre), -30.0, 0.0);
        let t = s.current();
        assert_eq!(t.rect, Rect::new(-20.0, 0.0, 20.0, 10.0));
        assert_eq!(t.scale_params, ScaleParams::IDENTITY);
    }

    #[test]
    fn resize_rect_is_always_normalized() {
        let pre = Transform::upright(Rect::new(40.0, 40.0, 20.0, 20.0));
        for (dx, dy) in [(-100.0, -100.0), (-21.0, 3.0), (0.0, -20.5), (300.0, -60.0)] {
            let t = moved(session(TransformAction::Resize, pre), dx, dy).current();
            assert!(t.rect.width >= 0.0 && t.rect.height >= 0.0, "{dx},{dy}: {t:?}");
        }
    }

    #[test]
    fn always_resize_overrides_drag() {
        let pre = Transform::upright(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut s = moved(session(TransformAction::Drag, pre), 5.0, 5.0);
        s.always_resize = true;
        assert_eq!(s.current().rect, Rect::new(0.0, 0.0, 15.0, 15.0));
    }

    #[test]
    fn repeated_updates_do_not_drift() {
        let pre = Transform::upright(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut s = session(TransformAction::Resize, pre);
        for step in 1..=50 {
            s.update(Point::new(step as f64, -(step as f64)), SurfaceFrame::default());
            let _ = s.current();
        }
        s.update(Point::new(3.0, 4.0), SurfaceFrame::default());
        assert_eq!(s.current().rect, Rect::new(0.0, 0.0, 13.0, 14.0));
    }

    #[test]
    fn marquee_grows_from_anchor_and_flips() {
        let frame = SurfaceFrame::at(Point::new(10.0, 10.0));
        let mut s = TransformSession::marquee(Point::new(60.0, 60.0), frame);
        assert_eq!(s.start_surface(), Point::new(50.0, 50.0));

        s.update(Point::new(40.0, 90.0), frame);
        assert_eq!(s.delta(), (-20.0, 30.0));
        assert_eq!(
            s.current(),
            Transform::new(Rect::new(30.0, 50.0, 20.0, 30.0), ScaleParams::new(-1.0, 1.0))
        );
    }

    #[test]
    fn scrolling_mid_gesture_is_compensated() {
        let pre = Transform::upright(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut s = TransformSession::begin(
            TransformAction::Drag,
            Point::new(150.0, 150.0),
            SurfaceFrame::at(Point::new(0.0, 0.0)),
            pre,
        );
        // Page scrolled by 40px: the surface moved up, the pointer did not.
        s.update(Point::new(150.0, 150.0), SurfaceFrame::at(Point::new(0.0, -40.0)));
        assert_eq!(s.delta(), (0.0, 40.0));
        assert_eq!(s.current().rect, Rect::new(0.0, 40.0, 10.0, 10.0));
    }

    #[test]
    fn css_scaled_surface_converts_deltas() {
        let frame = SurfaceFrame::from_bounding_box(0.0, 0.0, 400.0, 300.0, 800, 600);
        let pre = Transform::upright(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut s = TransformSession::begin(TransformAction::Drag, Point::ZERO, frame, pre);
        s.update(Point::new(10.0, 5.0), frame);
        assert_eq!(s.delta(), (20.0, 10.0));
    }
}
