//! Slicing, cloning, grafting and compaction.

use super::Array;
use crate::cycle::CycleGuard;
use crate::errors::{slice_out_of_range, DatumResult};
use crate::value::{clone_array, clone_range};

impl Array {
    /// Normalize a signed `(index, count)` pair to a position and length.
    ///
    /// A negative `count` names the end of the span from the back of the
    /// array (`-1` stops before the last element). With `clamp`, a span
    /// running past the end is shortened instead of rejected.
    fn normalize_span(&self, index: isize, count: isize, clamp: bool) -> DatumResult<(usize, usize)> {
        let len = self.items.len();
        let start = self.normalize_index(index)?;
        let span = if count < 0 {
            len.checked_sub(count.unsigned_abs())
                .and_then(|end| end.checked_sub(start))
                .ok_or_else(|| slice_out_of_range(index, count, len))?
        } else {
            count.unsigned_abs()
        };
        let room = len - start;
        if span <= room {
            Ok((start, span))
        } else if clamp {
            Ok((start, room))
        } else {
            Err(slice_out_of_range(index, count, len))
        }
    }

    /// Deep copies of the `count` elements starting at `index`.
    pub fn slice(&self, index: isize, count: isize, clamp: bool) -> DatumResult<Array> {
        let (start, span) = self.normalize_span(index, count, clamp)?;
        clone_range(self, start..start + span, &mut CycleGuard::new())
    }

    /// Move the `count` elements starting at `index` out into a new array,
    /// closing the gap.
    pub fn cut(&mut self, index: isize, count: isize, clamp: bool) -> DatumResult<Array> {
        let (start, span) = self.normalize_span(index, count, clamp)?;
        let mut out = Array::with_capacity(span)?;
        out.items.extend(self.items.drain(start..start + span));
        Ok(out)
    }

    /// Deep copy of the whole array.
    ///
    /// Fails with `RecursionDetected` if the array contains itself.
    #[tracing::instrument(level = "trace", skip_all, fields(len = self.len()))]
    pub fn deep_clone(&self) -> DatumResult<Array> {
        clone_array(self, &mut CycleGuard::new())
    }

    /// Append deep copies of `other`'s elements. On error `self` is unchanged.
    pub fn graft(&mut self, other: &Array) -> DatumResult<()> {
        self.need(other.len())?;
        let mut copies = other.deep_clone()?;
        self.items.append(&mut copies.items);
        Ok(())
    }

    /// Append `other`'s elements, moving them.
    pub fn graft_owned(&mut self, mut other: Array) -> DatumResult<()> {
        self.need(other.len())?;
        self.items.append(&mut other.items);
        Ok(())
    }

    /// New array holding deep copies of `self` followed by `other`.
    pub fn concat(&self, other: &Array) -> DatumResult<Array> {
        let mut out = Array::with_capacity(self.len().saturating_add(other.len()))?;
        out.graft(self)?;
        out.graft(other)?;
        Ok(out)
    }

    /// Remove every nil element, keeping the order of the rest.
    pub fn compact(&mut self) {
        self.items.retain(|item| !item.is_nil());
    }
}
