//! Deep copy.
//!
//! Owned strings and blobs are duplicated, string and blob references are
//! re-pointed at the same payload, and arrays (owned or referenced) are
//! cloned element by element. Cloning an array that contains itself fails
//! with `RecursionDetected`.

use std::ops::Range;

use super::{Heap, Value};
use crate::array::{Array, ArrayHandle};
use crate::cycle::CycleGuard;
use crate::errors::DatumResult;

impl Value {
    /// Deep copy of this value.
    pub fn deep_copy(&self) -> DatumResult<Value> {
        copy_value(self, &mut CycleGuard::new())
    }

    /// Replace this value with a deep copy of `src`.
    ///
    /// On error this value is left unchanged.
    pub fn copy_from(&mut self, src: &Value) -> DatumResult<()> {
        *self = src.deep_copy()?;
        Ok(())
    }
}

pub(crate) fn copy_value(value: &Value, guard: &mut CycleGuard) -> DatumResult<Value> {
    Ok(match value {
        Value::Nil => Value::Nil,
        Value::Bool(b) => Value::Bool(*b),
        Value::Int(i) => Value::Int(*i),
        Value::UInt(u) => Value::UInt(*u),
        Value::Real(r) => Value::Real(*r),
        Value::MiniStr(mini) => Value::MiniStr(*mini),
        Value::Str(heap) => Value::Str(Heap::from(&**heap)),
        Value::StrRef(weak) => Value::StrRef(weak.clone()),
        Value::Blob(heap) => Value::Blob(Heap::from(&**heap)),
        Value::BlobRef(weak) => Value::BlobRef(weak.clone()),
        Value::Array(_) | Value::ArrayRef(_) => {
            let handle = value.array_handle()?;
            let source = handle.try_borrow()?;
            Value::Array(ArrayHandle::new(clone_array(&source, guard)?))
        }
    })
}

/// Deep copy of every element of `src`.
pub(crate) fn clone_array(src: &Array, guard: &mut CycleGuard) -> DatumResult<Array> {
    clone_range(src, 0..src.len(), guard)
}

/// Deep copy of the elements of `src` in `range`.
pub(crate) fn clone_range(src: &Array, range: Range<usize>, guard: &mut CycleGuard) -> DatumResult<Array> {
    guard.visit(src.addr(), |guard| {
        let mut out = Array::with_capacity(range.len())?;
        for item in &src.as_slice()[range] {
            out.push(copy_value(item, guard)?)?;
        }
        Ok(out)
    })?
}
