//! Self-containment detection for recursive array traversals.
//!
//! A [`CycleGuard`] is threaded through one traversal. It holds the
//! addresses of the arrays on the current descent path: an array is added
//! when the traversal enters it and removed when it returns. Reaching an
//! array that is already on the path means the array contains itself.
//!
//! Only the path is tracked, not every array seen, so a value shared by
//! two siblings (a DAG) is not mistaken for a cycle.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::errors::{recursion_detected, DatumResult};
use crate::stack::ensure_sufficient_stack;

/// Arrays on the current traversal path, keyed by address.
#[derive(Debug, Default)]
pub(crate) struct CycleGuard {
    path: FxHashSet<usize>,
}

impl CycleGuard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Run `f` with the array at `addr` on the path.
    ///
    /// Fails with `RecursionDetected` without calling `f` if the array is
    /// already on the path.
    pub(crate) fn visit<R>(&mut self, addr: usize, f: impl FnOnce(&mut Self) -> R) -> DatumResult<R> {
        if !self.path.insert(addr) {
            debug!(depth = self.path.len(), "array contains itself");
            return Err(recursion_detected());
        }
        let result = ensure_sufficient_stack(|| f(self));
        self.path.remove(&addr);
        Ok(result)
    }

    /// Number of arrays on the current path.
    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.path.len()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use crate::DatumErrorKind;

    #[test]
    fn revisiting_an_ancestor_fails() {
        let mut guard = CycleGuard::new();
        let err = guard
            .visit(1, |g| g.visit(2, |g| g.visit(1, |_| ())))
            .unwrap()
            .unwrap()
            .unwrap_err();
        assert_eq!(err.kind, DatumErrorKind::RecursionDetected);
        assert_eq!(guard.depth(), 0);
    }

    #[test]
    fn siblings_may_share_an_array() {
        let mut guard = CycleGuard::new();
        let result = guard.visit(1, |g| {
            let first = g.visit(2, |g| g.depth());
            let second = g.visit(2, |g| g.depth());
            (first, second)
        });
        assert_eq!(result, Ok((Ok(2), Ok(2))));
    }
}
