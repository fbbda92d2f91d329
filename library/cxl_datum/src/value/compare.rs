//! Value equality.
//!
//! Integers, unsigned integers and reals compare by exact mathematical
//! value, so `Int(3) == Real(3.0)` and `Int(-1) != UInt(u64::MAX)`.
//! Strings compare by text (optionally ignoring ASCII case) and never equal
//! blobs. Arrays compare element by element under a cycle guard: an array
//! equals itself, but two distinct arrays that each contain themselves do
//! not compare equal.

use super::Value;
use crate::array::{Array, ArrayHandle};
use crate::cycle::CycleGuard;

impl Value {
    /// Compare two values, optionally ignoring ASCII case in strings.
    pub fn equals(&self, other: &Value, ignore_case: bool) -> bool {
        values_equal(self, other, ignore_case, &mut CycleGuard::new())
    }
}

#[derive(Clone, Copy)]
enum Number {
    Int(i128),
    Real(f64),
}

impl Number {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(Number::Int(i128::from(*i))),
            Value::UInt(u) => Some(Number::Int(i128::from(*u))),
            Value::Real(r) => Some(Number::Real(*r)),
            _ => None,
        }
    }

    #[allow(clippy::float_cmp, reason = "numeric equality is exact")]
    fn equals(self, other: Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Real(a), Number::Real(b)) => a == b,
            (Number::Int(i), Number::Real(r)) | (Number::Real(r), Number::Int(i)) => {
                real_equals_int(r, i)
            }
        }
    }
}

#[allow(clippy::float_cmp, reason = "an integral real has no fractional part")]
fn real_equals_int(r: f64, i: i128) -> bool {
    // 2^64; every i64 and u64 lies strictly inside +-2^64.
    const LIMIT: f64 = 18_446_744_073_709_551_616.0;

    if !r.is_finite() || r.fract() != 0.0 || r.abs() >= LIMIT {
        return false;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "r is integral and below 2^64 in magnitude"
    )]
    let whole = r as i128;
    whole == i
}

pub(crate) fn values_equal(a: &Value, b: &Value, ignore_case: bool, guard: &mut CycleGuard) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => return true,
        (Value::Bool(x), Value::Bool(y)) => return x == y,
        _ => {}
    }
    if let (Some(x), Some(y)) = (Number::of(a), Number::of(b)) {
        return x.equals(y);
    }

    match (a, b) {
        (Value::MiniStr(_) | Value::Str(_) | Value::StrRef(_), _) if b.is_str() => {
            let (Ok(x), Ok(y)) = (a.str_view(), b.str_view()) else {
                return false;
            };
            if ignore_case {
                x.eq_ignore_ascii_case(&y)
            } else {
                *x == *y
            }
        }
        (Value::Blob(_) | Value::BlobRef(_), _) if b.is_blob() => {
            matches!((a.blob_view(), b.blob_view()), (Ok(x), Ok(y)) if *x == *y)
        }
        (Value::Array(_) | Value::ArrayRef(_), _) if b.is_array() => {
            let (Ok(x), Ok(y)) = (a.array_handle(), b.array_handle()) else {
                return false;
            };
            handles_equal(&x, &y, ignore_case, guard)
        }
        _ => false,
    }
}

fn handles_equal(x: &ArrayHandle, y: &ArrayHandle, ignore_case: bool, guard: &mut CycleGuard) -> bool {
    if x.ptr_eq(y) {
        return true;
    }
    // A mutably borrowed array is an ancestor of this comparison.
    let (Ok(xa), Ok(ya)) = (x.try_borrow(), y.try_borrow()) else {
        return false;
    };
    arrays_equal(&xa, &ya, ignore_case, guard)
}

pub(crate) fn arrays_equal(x: &Array, y: &Array, ignore_case: bool, guard: &mut CycleGuard) -> bool {
    if std::ptr::eq(x, y) {
        return true;
    }
    if x.len() != y.len() {
        return false;
    }
    guard
        .visit(x.addr(), |guard| {
            guard.visit(y.addr(), |guard| {
                x.iter()
                    .zip(y.iter())
                    .all(|(a, b)| values_equal(a, b, ignore_case, guard))
            })
        })
        .and_then(|inner| inner)
        .unwrap_or(false)
}
