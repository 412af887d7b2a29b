use lasso::{Spur, ThreadedRodeo};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for element IDs. Counters are per surface, so
/// surfaces reuse the same `image_0`, `text_1`, … strings.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Identifier of one floating element on a surface (`image_0`, `text_3`).
/// Interned: 4 bytes, Copy, O(1) Eq and Hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// Intern `s` as an ElementId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    /// Look up an already-interned id without creating a new one.
    pub fn get(s: &str) -> Option<Self> {
        INTERNER.get(s).map(ElementId)
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

/// Hands out element ids unique within one surface.
#[derive(Debug, Default, Clone)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    /// The next id with a kind prefix (e.g. `image_0`, `text_1`).
    pub fn next(&mut self, prefix: &str) -> ElementId {
        let n = self.next;
        self.next += 1;
        ElementId::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ElementId::intern("image_logo");
        let b = ElementId::intern("image_logo");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "image_logo");
        assert_eq!(ElementId::get("image_logo"), Some(a));
    }

    #[test]
    fn counter_ids_are_unique_per_counter() {
        let mut ids = IdCounter::default();
        let a = ids.next("text");
        let b = ids.next("image");
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "text_0");
        assert_eq!(b.as_str(), "image_1");

        let mut other = IdCounter::default();
        assert_eq!(other.next("text"), a);
    }
}
