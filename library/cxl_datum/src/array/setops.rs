//! Set operations over arrays.
//!
//! Elements are compared with [`Value::equals`]. Results hold each distinct
//! element once, in order of first occurrence. The copying forms return a
//! new array of deep copies; the in-place forms reuse the existing values.

use super::Array;
use crate::errors::DatumResult;
use crate::value::Value;

/// Which elements [`Array::matching`] keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Elements also present in the other array.
    Intersection,
    /// Elements absent from the other array.
    Difference,
}

impl MatchMode {
    fn keeps(self, found: bool) -> bool {
        match self {
            MatchMode::Intersection => found,
            MatchMode::Difference => !found,
        }
    }
}

impl Array {
    /// True if some element equals `value`.
    pub fn contains(&self, value: &Value, ignore_case: bool) -> bool {
        self.position(value, ignore_case).is_some()
    }

    /// Position of the first element equal to `value`.
    pub fn position(&self, value: &Value, ignore_case: bool) -> Option<usize> {
        self.items.iter().position(|item| item.equals(value, ignore_case))
    }

    /// Distinct elements of `self` that are (or are not) in `other`, copied.
    pub fn matching(&self, other: &Array, mode: MatchMode, ignore_case: bool) -> DatumResult<Array> {
        let mut out = Array::new();
        for item in &self.items {
            if mode.keeps(other.contains(item, ignore_case)) && !out.contains(item, ignore_case) {
                out.push_copy(item)?;
            }
        }
        Ok(out)
    }

    /// In-place form of [`matching`](Self::matching).
    pub fn retain_matching(&mut self, other: &Array, mode: MatchMode, ignore_case: bool) -> DatumResult<()> {
        let mut kept = Array::with_capacity(self.items.len())?;
        for item in std::mem::take(&mut self.items) {
            if mode.keeps(other.contains(&item, ignore_case)) && !kept.contains(&item, ignore_case) {
                kept.items.push(item);
            }
        }
        *self = kept;
        Ok(())
    }

    /// Distinct elements of `self`, then those of `other` not already
    /// present, copied.
    pub fn unique(&self, other: Option<&Array>, ignore_case: bool) -> DatumResult<Array> {
        let mut out = Array::new();
        let tail = other.map_or(&[][..], Array::as_slice);
        for item in self.items.iter().chain(tail) {
            if !out.contains(item, ignore_case) {
                out.push_copy(item)?;
            }
        }
        Ok(out)
    }

    /// In-place form of [`unique`](Self::unique).
    pub fn make_unique(&mut self, other: Option<&Array>, ignore_case: bool) -> DatumResult<()> {
        let mut kept = Array::with_capacity(self.items.len())?;
        for item in std::mem::take(&mut self.items) {
            if !kept.contains(&item, ignore_case) {
                kept.items.push(item);
            }
        }
        if let Some(other) = other {
            for item in &other.items {
                if !kept.contains(item, ignore_case) {
                    kept.push_copy(item)?;
                }
            }
        }
        *self = kept;
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
