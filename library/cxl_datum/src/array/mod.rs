//! Resizable arrays of values.
//!
//! Every position-taking operation accepts a signed index: non-negative
//! indices count from the front, negative ones from the back (`-1` is the
//! last element). An index that does not name an existing element fails
//! with `IndexOutOfRange`, except where an operation documents growth.
//!
//! Capacity follows a geometric policy (see [`growth`]) and every
//! allocation is fallible, surfacing as `OutOfMemory`.
//!
//! An `Array` stored in a [`Value`] lives behind an [`ArrayHandle`]
//! (`Rc<RefCell<Array>>`); reference values hold an [`ArrayRef`] instead.

mod growth;
mod iter;
pub(crate) mod render;
mod setops;
mod slice;
mod split;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;

pub use iter::{Iter, IterMut};
pub use render::{RenderFlags, RenderOptions, RenderStatus, Rendered, RECURSION_PLACEHOLDER};
pub use setops::MatchMode;
pub use split::Delimiter;

use crate::cycle::CycleGuard;
use crate::errors::{index_out_of_range, recursion_detected, DatumResult};
use crate::stack::ensure_sufficient_stack;
use crate::value::{arrays_equal, Heap, HeapRef, Value};

/// Non-owning reference to a shared array.
pub type ArrayRef = HeapRef<RefCell<Array>>;

/// An ordered, growable sequence of owned values.
#[derive(Debug, Default)]
pub struct Array {
    items: Vec<Value>,
}

impl Array {
    /// An empty array. Does not allocate.
    pub fn new() -> Self {
        Array { items: Vec::new() }
    }

    /// An empty array with room for at least `capacity` elements.
    pub fn with_capacity(capacity: usize) -> DatumResult<Self> {
        let mut array = Array::new();
        array.need(capacity)?;
        Ok(array)
    }

    /// An array of `len` elements, each nil or a deep copy of `fill`.
    pub fn with_len(len: usize, fill: Option<&Value>) -> DatumResult<Self> {
        let mut array = Array::with_capacity(len)?;
        match fill {
            None => array.items.resize_with(len, Value::default),
            Some(value) => {
                for _ in 0..len {
                    array.items.push(value.deep_copy()?);
                }
            }
        }
        Ok(array)
    }

    /// An array holding `values`, in order.
    pub fn from_values(values: Vec<Value>) -> Self {
        Array { items: values }
    }

    /// Drop every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Consume the array, returning its elements.
    pub fn into_values(mut self) -> Vec<Value> {
        std::mem::take(&mut self.items)
    }

    /// Address of this array, used as an identity key by the cycle guard.
    pub(crate) fn addr(&self) -> usize {
        std::ptr::from_ref(self) as usize
    }

    /// Convert a signed index into a position of an existing element.
    pub(crate) fn normalize_index(&self, index: isize) -> DatumResult<usize> {
        let len = self.items.len();
        let pos = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            Some(index.unsigned_abs()).filter(|&pos| pos < len)
        };
        pos.ok_or_else(|| index_out_of_range(index, len))
    }

    pub fn get(&self, index: isize) -> DatumResult<&Value> {
        let pos = self.normalize_index(index)?;
        Ok(&self.items[pos])
    }

    pub fn get_mut(&mut self, index: isize) -> DatumResult<&mut Value> {
        let pos = self.normalize_index(index)?;
        Ok(&mut self.items[pos])
    }

    /// Like [`get_mut`](Self::get_mut), but a non-negative index past the
    /// end grows the array with nil elements so that it exists.
    pub fn get_or_grow(&mut self, index: isize) -> DatumResult<&mut Value> {
        let pos = if index < 0 {
            self.normalize_index(index)?
        } else {
            let pos = index.unsigned_abs();
            self.need_index(pos)?;
            pos
        };
        Ok(&mut self.items[pos])
    }

    /// Replace the element at `index`.
    pub fn set(&mut self, index: isize, value: Value) -> DatumResult<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    pub fn push(&mut self, value: Value) -> DatumResult<()> {
        self.need(1)?;
        self.items.push(value);
        Ok(())
    }

    /// Push a deep copy of `value`.
    pub fn push_copy(&mut self, value: &Value) -> DatumResult<()> {
        self.push(value.deep_copy()?)
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<Value> {
        self.items.pop()
    }

    /// Remove and return the first element.
    pub fn shift(&mut self) -> Option<Value> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Insert `value` at the front.
    pub fn unshift(&mut self, value: Value) -> DatumResult<()> {
        self.need(1)?;
        self.items.insert(0, value);
        Ok(())
    }

    /// Insert a deep copy of `value` at the front.
    pub fn unshift_copy(&mut self, value: &Value) -> DatumResult<()> {
        self.unshift(value.deep_copy()?)
    }

    /// Insert `value` before the element at `index`.
    ///
    /// `index` may equal the length, which appends.
    pub fn insert(&mut self, index: isize, value: Value) -> DatumResult<()> {
        if index.unsigned_abs() == self.items.len() && index >= 0 {
            return self.push(value);
        }
        let pos = self.normalize_index(index)?;
        self.need(1)?;
        self.items.insert(pos, value);
        Ok(())
    }

    /// Insert a deep copy of `value` before the element at `index`.
    pub fn insert_copy(&mut self, index: isize, value: &Value) -> DatumResult<()> {
        self.insert(index, value.deep_copy()?)
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: isize) -> DatumResult<Value> {
        let pos = self.normalize_index(index)?;
        Ok(self.items.remove(pos))
    }

    /// Compare element by element, optionally ignoring ASCII case in strings.
    pub fn equals(&self, other: &Array, ignore_case: bool) -> bool {
        arrays_equal(self, other, ignore_case, &mut CycleGuard::new())
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.items)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_> {
        IterMut::new(&mut self.items)
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, false)
    }
}

impl From<Vec<Value>> for Array {
    fn from(values: Vec<Value>) -> Self {
        Array::from_values(values)
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut Array {
    type Item = &'a mut Value;
    type IntoIter = IterMut<'a>;

    fn into_iter(self) -> IterMut<'a> {
        self.iter_mut()
    }
}

// Nested arrays are torn down through a worklist so dropping a deep
// nesting uses constant stack.
impl Drop for Array {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.items);
        while let Some(item) = pending.pop() {
            let Value::Array(mut handle) = item else {
                continue;
            };
            match handle.take_items_if_unique() {
                Some(mut items) => pending.append(&mut items),
                // Still shared or referenced: whoever drops it last runs
                // this same loop for its elements.
                None => ensure_sufficient_stack(|| drop(handle)),
            }
        }
    }
}

/// Owning shared handle to an array stored in a [`Value`].
///
/// Borrowing is checked at run time. A borrow that conflicts with one
/// already held can only come from an array reached through itself, so it
/// is reported as `RecursionDetected`.
///
/// Cloning shares the array. Storing an owned handle inside its own array
/// creates an `Rc` cycle that is never freed; use a reference value
/// ([`Value::set_array_ref`]) for self-containment.
#[repr(transparent)]
pub struct ArrayHandle(Heap<RefCell<Array>>);

impl ArrayHandle {
    pub fn new(array: Array) -> Self {
        ArrayHandle(Heap::new(RefCell::new(array)))
    }

    /// Recover a handle from a reference, if the array is still alive.
    pub fn from_ref(weak: &ArrayRef) -> DatumResult<Self> {
        weak.upgrade().map(ArrayHandle)
    }

    pub fn try_borrow(&self) -> DatumResult<Ref<'_, Array>> {
        self.0.try_borrow().map_err(|_| recursion_detected())
    }

    pub fn try_borrow_mut(&self) -> DatumResult<RefMut<'_, Array>> {
        self.0.try_borrow_mut().map_err(|_| recursion_detected())
    }

    /// Non-owning reference to this array.
    pub fn downgrade(&self) -> ArrayRef {
        self.0.downgrade()
    }

    /// True if both handles share one array.
    pub fn ptr_eq(&self, other: &ArrayHandle) -> bool {
        Heap::ptr_eq(&self.0, &other.0)
    }

    /// Move the elements out if this is the only handle and nothing refers
    /// to the array.
    fn take_items_if_unique(&mut self) -> Option<Vec<Value>> {
        Heap::get_mut(&mut self.0).map(|cell| std::mem::take(&mut cell.get_mut().items))
    }

    /// Address of the array, matching [`Array::addr`] for the borrowed array.
    pub(crate) fn addr(&self) -> usize {
        self.0.as_ptr() as usize
    }
}

impl Clone for ArrayHandle {
    fn clone(&self) -> Self {
        ArrayHandle(self.0.clone())
    }
}

impl fmt::Debug for ArrayHandle {
    // Elements are not printed: the array may contain itself.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("ArrayHandle");
        dbg.field("addr", &format_args!("{:#x}", self.addr()));
        match self.0.try_borrow() {
            Ok(array) => dbg.field("len", &array.len()),
            Err(_) => dbg.field("len", &"<borrowed>"),
        };
        dbg.finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
