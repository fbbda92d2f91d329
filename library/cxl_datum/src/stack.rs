//! Native stack growth for recursive traversals.
//!
//! Deep copy, equality and rendering recurse once per nesting level of
//! arrays. Each level runs inside [`ensure_sufficient_stack`], so an
//! acyclic nesting is limited by memory, not by the thread stack.

/// Headroom that must remain before a level runs on the current segment.
const MIN_HEADROOM: usize = 128 * 1024;

/// Size of each stack segment added when headroom runs out.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, moving to a fresh stack segment if headroom is short.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(MIN_HEADROOM, SEGMENT_SIZE, f)
}

/// wasm32 has no segmented stacks; the traversal runs in place.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use crate::array::{Array, RenderOptions};
    use crate::value::Value;

    fn nested(depth: usize) -> Value {
        let mut value = Value::string("leaf").unwrap();
        for _ in 0..depth {
            value = Value::array(Array::from_values(vec![value]));
        }
        value
    }

    fn nesting_depth(value: &Value) -> usize {
        match value.array_handle() {
            Ok(handle) => {
                let array = handle.try_borrow().unwrap();
                ensure_sufficient_stack(|| 1 + nesting_depth(array.get(0).unwrap()))
            }
            Err(_) => 0,
        }
    }

    #[test]
    fn walks_a_deep_array_nesting() {
        let value = nested(100_000);
        assert_eq!(nesting_depth(&value), 100_000);
    }

    #[test]
    fn deep_render_finishes_with_full_brackets() {
        const DEPTH: usize = 50_000;
        let value = nested(DEPTH);
        let rendered = Array::from_values(vec![value])
            .render(&RenderOptions::new(""))
            .unwrap();
        assert!(rendered.status.is_complete());
        let text = rendered.value.str_view().unwrap().to_string();
        assert!(text.starts_with("[[[["));
        assert_eq!(text.len(), 2 * DEPTH + "leaf".len());
    }
}
