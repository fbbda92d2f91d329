//! Capacity growth.
//!
//! The first allocation holds [`ARRAY_CHUNK_SIZE`] elements. Capacity then
//! doubles twice and grows by 75% from there on, so large arrays do not
//! overshoot by as much as pure doubling would. Capacity never exceeds
//! [`ARRAY_SIZE_MAX`].

use tracing::trace;

use super::Array;
use crate::errors::{array_too_large, out_of_memory, DatumResult};
use crate::limits::{ARRAY_CHUNK_SIZE, ARRAY_SIZE_MAX};
use crate::value::Value;

/// Smallest capacity on the growth curve from `current` that holds `required`.
///
/// `required` must not exceed [`ARRAY_SIZE_MAX`].
pub(crate) fn next_capacity(current: usize, required: usize) -> usize {
    let mut size = current;
    while size < required {
        size = if size == 0 {
            ARRAY_CHUNK_SIZE
        } else if size < ARRAY_CHUNK_SIZE * 4 {
            size * 2
        } else {
            let step = (size >> 2) * 3;
            if ARRAY_SIZE_MAX - size < step {
                ARRAY_SIZE_MAX
            } else {
                size + step
            }
        };
    }
    size
}

impl Array {
    /// Make room for `additional` more elements without changing the length.
    pub(crate) fn need(&mut self, additional: usize) -> DatumResult<()> {
        let required = self
            .items
            .len()
            .checked_add(additional)
            .filter(|&n| n <= ARRAY_SIZE_MAX)
            .ok_or_else(array_too_large)?;
        self.reserve_to(required)
    }

    /// Make sure position `index` exists, filling new slots with nil.
    pub(crate) fn need_index(&mut self, index: usize) -> DatumResult<()> {
        if index < self.items.len() {
            return Ok(());
        }
        if index >= ARRAY_SIZE_MAX {
            return Err(array_too_large());
        }
        let required = index + 1;
        self.reserve_to(required)?;
        self.items.resize_with(required, Value::default);
        Ok(())
    }

    fn reserve_to(&mut self, required: usize) -> DatumResult<()> {
        let old = self.items.capacity();
        if required <= old {
            return Ok(());
        }
        let target = next_capacity(old, required);
        self.items
            .try_reserve_exact(target - self.items.len())
            .map_err(|_| out_of_memory(&format!("{target}-element array")))?;
        trace!(old, new = self.items.capacity(), "array grown");
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn growth_curve() {
        let mut sizes = vec![];
        let mut size = 0;
        for _ in 0..6 {
            size = next_capacity(size, size + 1);
            sizes.push(size);
        }
        assert_eq!(sizes, vec![8, 16, 32, 56, 98, 170]);
    }

    #[test]
    fn large_requests_jump_directly() {
        assert_eq!(next_capacity(0, 8), 8);
        assert_eq!(next_capacity(0, 9), 16);
        assert_eq!(next_capacity(16, 100), 170);
        assert_eq!(next_capacity(64, 64), 64);
    }

    #[test]
    fn growth_saturates_at_maximum() {
        assert_eq!(next_capacity(ARRAY_SIZE_MAX - 1, ARRAY_SIZE_MAX), ARRAY_SIZE_MAX);
    }

    #[test]
    fn need_rejects_oversized_requests() {
        let mut array = Array::new();
        let err = array.need(ARRAY_SIZE_MAX + 1).unwrap_err();
        assert_eq!(err.kind, crate::DatumErrorKind::InvalidArgument);
        assert_eq!(array.capacity(), 0);
    }

    #[test]
    fn need_index_fills_with_nil() {
        let mut array = Array::new();
        array.need_index(3).unwrap();
        assert_eq!(array.len(), 4);
        assert!(array.iter().all(Value::is_nil));
        assert_eq!(array.capacity(), 8);
    }
}
