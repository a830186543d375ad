//! Garbage collection infrastructure - base types.

use std::fmt;

/// Handle to a heap-allocated object.
///
/// Handles are stable for the lifetime of the heap that issued them; the heap never
/// moves or reuses a slot while the runtime is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl ObjectId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
