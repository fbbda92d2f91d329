//! Shared heap handles for string, blob and array payloads.
//!
//! [`Heap<T>`] is the owning handle stored in owned `Value` variants.
//! [`HeapRef<T>`] is the non-owning counterpart stored in reference
//! variants: it never keeps the payload alive, and a reference whose
//! payload has been dropped reports `DanglingReference` instead of reading
//! freed memory.
//!
//! Both use `Rc`: values are single-threaded.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::errors::{dangling_reference, DatumResult};

/// Owning handle to a heap payload.
///
/// Cloning a `Heap` shares the payload; a `Value` copy duplicates it
/// instead (see `Value::deep_copy`).
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Rc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }
}

impl<T: ?Sized> Heap<T> {
    /// Create a non-owning reference to this payload.
    #[inline]
    pub fn downgrade(&self) -> HeapRef<T> {
        HeapRef(Rc::downgrade(&self.0))
    }

    /// Mutable access to the payload when no other handle or reference
    /// exists.
    #[inline]
    pub(crate) fn get_mut(this: &mut Self) -> Option<&mut T> {
        Rc::get_mut(&mut this.0)
    }

    /// True if both handles point at the same payload.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: ?Sized + Eq> Eq for Heap<T> {}

impl<T: ?Sized + Hash> Hash for Heap<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl From<&str> for Heap<str> {
    fn from(s: &str) -> Self {
        Heap(Rc::from(s))
    }
}

impl From<String> for Heap<str> {
    fn from(s: String) -> Self {
        Heap(Rc::from(s))
    }
}

impl From<&[u8]> for Heap<[u8]> {
    fn from(bytes: &[u8]) -> Self {
        Heap(Rc::from(bytes))
    }
}

impl From<Vec<u8>> for Heap<[u8]> {
    fn from(bytes: Vec<u8>) -> Self {
        Heap(Rc::from(bytes))
    }
}

/// Non-owning handle to a heap payload.
#[repr(transparent)]
pub struct HeapRef<T: ?Sized>(Weak<T>);

impl<T: ?Sized> HeapRef<T> {
    /// Get an owning handle to the payload for the duration of an access.
    pub fn upgrade(&self) -> DatumResult<Heap<T>> {
        self.0.upgrade().map(Heap).ok_or_else(dangling_reference)
    }

    /// True if the payload has been dropped.
    pub fn is_dangling(&self) -> bool {
        self.0.strong_count() == 0
    }

    /// True if this reference points at `heap`'s payload.
    pub fn points_to(&self, heap: &Heap<T>) -> bool {
        std::ptr::addr_eq(self.0.as_ptr(), Rc::as_ptr(&heap.0))
    }

    /// Payload address, used as an identity key.
    pub(crate) fn addr(&self) -> usize {
        self.0.as_ptr().cast::<()>() as usize
    }
}

impl<T: ?Sized> Clone for HeapRef<T> {
    #[inline]
    fn clone(&self) -> Self {
        HeapRef(Weak::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for HeapRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dangling() {
            write!(f, "<dangling>")
        } else {
            write!(f, "<ref {:#x}>", self.addr())
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
