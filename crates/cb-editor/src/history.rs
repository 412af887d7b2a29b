//! Undo/redo over whole-state snapshots.
//!
//! The history is three parts: `past` (oldest first), `present`, and
//! `future` (next redo last). Recording a new state moves `present` into
//! `past` and drops the redo branch. When `past` outgrows the configured
//! depth, the oldest entries are discarded.

/// Linear undo/redo history of snapshots.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: Vec<T>,
    present: T,
    future: Vec<T>,
    /// Maximum number of undo steps kept.
    max_depth: usize,
}

impl<T> History<T> {
    /// Unbounded history starting at `present`.
    pub fn new(present: T) -> Self {
        Self::with_depth(present, usize::MAX)
    }

    /// History keeping at most `max_depth` undo steps (at least one).
    pub fn with_depth(present: T, max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record `snapshot` as the new present.
    pub fn set(&mut self, snapshot: T) {
        let previous = std::mem::replace(&mut self.present, snapshot);
        self.past.push(previous);
        if self.past.len() > self.max_depth {
            self.past.remove(0);
        }
        self.future.clear();
    }

    /// Step back. Returns the new present, or `None` if there is nothing to
    /// undo.
    pub fn undo(&mut self) -> Option<&T> {
        let previous = self.past.pop()?;
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        Some(&self.present)
    }

    /// Step forward. Returns the new present, or `None` if there is nothing
    /// to redo.
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.future.pop()?;
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        Some(&self.present)
    }

    /// Forget everything and start over at `present`.
    pub fn reset(&mut self, present: T) {
        self.past.clear();
        self.future.clear();
        self.present = present;
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn undo_redo_walks_snapshots() {
        let mut h = History::new("a");
        h.set("b");
        h.set("c");

        assert_eq!(h.undo(), Some(&"b"));
        assert_eq!(h.undo(), Some(&"a"));
        assert_eq!(h.undo(), None);
        assert_eq!(*h.present(), "a");

        assert_eq!(h.redo(), Some(&"b"));
        assert_eq!(h.redo(), Some(&"c"));
        assert_eq!(h.redo(), None);
        assert_eq!(*h.present(), "c");
    }

    #[test]
    fn set_after_undo_discards_redo_branch() {
        let mut h = History::new(0);
        h.set(1);
        h.set(2);
        h.undo();
        h.set(3);

        assert!(!h.can_redo());
        assert_eq!(h.undo(), Some(&1));
        assert_eq!(h.undo(), Some(&0));
    }

    #[test]
    fn empty_history_is_noop() {
        let mut h = History::new(7);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo(), None);
        assert_eq!(*h.present(), 7);
    }

    #[test]
    fn max_depth_trims_oldest() {
        let mut h = History::with_depth(0, 3);
        for i in 1..=5 {
            h.set(i);
        }
        assert_eq!(h.undo_len(), 3);
        h.undo();
        h.undo();
        assert_eq!(h.undo(), Some(&2));
        assert_eq!(h.undo(), None);
    }

    #[test]
    fn reset_forgets_both_directions() {
        let mut h = History::new(0);
        h.set(1);
        h.set(2);
        h.undo();
        h.reset(9);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(*h.present(), 9);
    }
}
