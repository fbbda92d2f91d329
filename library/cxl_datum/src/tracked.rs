//! Checkpointed LIFO registry of temporary values.
//!
//! A [`TrackedStack`] owns values registered with [`TrackedStack::track`]
//! until they are released in bulk. Take a [`Checkpoint`], track any
//! number of temporaries, then [`release_to`](TrackedStack::release_to) the
//! checkpoint to drop everything tracked since, newest first.
//!
//! [`TrackedStack::scoped`] wraps the pattern in an RAII guard:
//!
//! ```
//! use cxl_datum::{TrackedStack, Value};
//!
//! let mut stack = TrackedStack::new();
//! let keep = stack.track(Value::int(1));
//! {
//!     let mut scope = stack.scoped();
//!     scope.track(Value::int(2));
//!     scope.track(Value::int(3));
//!     assert_eq!(scope.len(), 3);
//! } // the two inner values are released here
//! assert_eq!(stack.len(), 1);
//! assert!(stack.get(keep).is_some());
//! ```

use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::value::Value;

/// Identifies a tracked value.
///
/// An id stays tied to the value it was issued for: once that value is
/// untracked or released, the id resolves to nothing, even if its slot is
/// reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrackedId {
    index: usize,
    serial: u64,
}

/// A position in a [`TrackedStack`] to release back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

#[derive(Debug)]
struct Slot {
    serial: u64,
    value: Value,
}

/// LIFO registry of values for checkpointed bulk release.
#[derive(Debug, Default)]
pub struct TrackedStack {
    slots: Vec<Option<Slot>>,
    next_serial: u64,
    live: usize,
}

impl TrackedStack {
    pub fn new() -> Self {
        TrackedStack::default()
    }

    /// Take ownership of `value` until it is untracked or released.
    pub fn track(&mut self, value: Value) -> TrackedId {
        let serial = self.next_serial;
        self.next_serial += 1;
        let index = self.slots.len();
        self.slots.push(Some(Slot { serial, value }));
        self.live += 1;
        TrackedId { index, serial }
    }

    fn slot(&self, id: TrackedId) -> Option<&Slot> {
        self.slots
            .get(id.index)?
            .as_ref()
            .filter(|slot| slot.serial == id.serial)
    }

    pub fn get(&self, id: TrackedId) -> Option<&Value> {
        self.slot(id).map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, id: TrackedId) -> Option<&mut Value> {
        self.slots
            .get_mut(id.index)?
            .as_mut()
            .filter(|slot| slot.serial == id.serial)
            .map(|slot| &mut slot.value)
    }

    /// Stop tracking the value for `id` and hand it back.
    pub fn untrack(&mut self, id: TrackedId) -> Option<Value> {
        self.slot(id)?;
        let slot = self.slots.get_mut(id.index)?.take()?;
        self.live -= 1;
        // The emptied slot stays until released so checkpoints keep their meaning.
        Some(slot.value)
    }

    /// The current top of the stack.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.slots.len())
    }

    /// Drop every value tracked after `checkpoint`, newest first.
    ///
    /// Returns the number of values dropped. A checkpoint at or above the
    /// current top releases nothing.
    pub fn release_to(&mut self, checkpoint: Checkpoint) -> usize {
        let mut released = 0;
        while self.slots.len() > checkpoint.0 {
            if let Some(Some(_)) = self.slots.pop() {
                released += 1;
            }
        }
        self.live -= released;
        if released > 0 {
            trace!(released, remaining = self.live, "tracked values released");
        }
        released
    }

    /// Drop every tracked value.
    pub fn release_all(&mut self) -> usize {
        self.release_to(Checkpoint(0))
    }

    /// Number of values currently tracked.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Guard that releases to the current checkpoint when dropped.
    pub fn scoped(&mut self) -> TrackedScope<'_> {
        let checkpoint = self.checkpoint();
        TrackedScope {
            stack: self,
            checkpoint,
        }
    }

    /// Run `f` in a scope; values it tracks are released when it returns.
    pub fn with_scope<T>(&mut self, f: impl FnOnce(&mut TrackedScope<'_>) -> T) -> T {
        let mut scope = self.scoped();
        f(&mut scope)
    }
}

/// RAII guard returned by [`TrackedStack::scoped`].
///
/// Dereferences to the stack. Dropping the guard, including during
/// unwinding, releases every value tracked through it.
pub struct TrackedScope<'a> {
    stack: &'a mut TrackedStack,
    checkpoint: Checkpoint,
}

impl TrackedScope<'_> {
    /// The checkpoint this scope releases to.
    pub fn start(&self) -> Checkpoint {
        self.checkpoint
    }
}

impl Drop for TrackedScope<'_> {
    fn drop(&mut self) {
        let _released = self.stack.release_to(self.checkpoint);
    }
}

impl Deref for TrackedScope<'_> {
    type Target = TrackedStack;

    fn deref(&self) -> &TrackedStack {
        self.stack
    }
}

impl DerefMut for TrackedScope<'_> {
    fn deref_mut(&mut self) -> &mut TrackedStack {
        self.stack
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
