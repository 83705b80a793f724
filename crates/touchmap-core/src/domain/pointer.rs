//! Virtual pointer id allocation.
//!
//! Every synthetic finger needs an id that no other live finger in the same
//! session is using. [`PointerManager`] hands out the lowest released id first
//! and otherwise counts upward, so ids stay small over long sessions.
//!
//! The manager is an explicitly constructed component owned by whoever builds
//! the engine; there is no global allocator. Engines that feed the same touch
//! pipeline share one manager, so ids stay unique across all of them.

use std::collections::BTreeSet;
use std::sync::Mutex;

/// Identifier of a virtual pointer (one synthetic finger).
pub type PointerId = i32;

const FIRST_POINTER_ID: PointerId = 0;

#[derive(Debug)]
struct Allocation {
    next: PointerId,
    released: BTreeSet<PointerId>,
}

/// Issues pointer ids that are unique among live pointers.
///
/// # Examples
///
/// ```rust
/// use touchmap_core::PointerManager;
///
/// let pointers = PointerManager::new();
/// let a = pointers.apply_pointer_id();
/// let b = pointers.apply_pointer_id();
/// assert_ne!(a, b);
///
/// pointers.release_pointer_id(a);
/// assert_eq!(pointers.apply_pointer_id(), a);
/// ```
#[derive(Debug)]
pub struct PointerManager {
    inner: Mutex<Allocation>,
}

impl PointerManager {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Allocation {
                next: FIRST_POINTER_ID,
                released: BTreeSet::new(),
            }),
        }
    }

    /// Returns an id not currently held by any live pointer.
    pub fn apply_pointer_id(&self) -> PointerId {
        let mut alloc = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(id) = alloc.released.pop_first() {
            return id;
        }
        let id = alloc.next;
        alloc.next = alloc.next.wrapping_add(1).max(FIRST_POINTER_ID);
        id
    }

    /// Returns `id` to the pool. Releasing an id that was never issued, or an
    /// id twice, is ignored.
    pub fn release_pointer_id(&self, id: PointerId) {
        let mut alloc = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if id < FIRST_POINTER_ID || id >= alloc.next {
            return;
        }
        alloc.released.insert(id);
    }
}

impl Default for PointerManager {
    fn default() -> Self {
        Self::new()
    }
}
