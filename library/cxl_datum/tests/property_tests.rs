//! Property-based tests for arrays, values and the builder.
//!
//! These use proptest to check invariants over generated inputs:
//! 1. Growth: capacity covers length after every push, with linear total copying
//! 2. Negative indexing mirrors positive indexing
//! 3. Scalars render to text that parses back to the same value
//! 4. Builder output matches the plain concatenation in either direction

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::cast_possible_wrap,
    reason = "lengths in these tests are far below isize::MAX"
)]

use cxl_datum::{Array, Builder, CloseKind, Delimiter, FabMode, Value};
use proptest::prelude::*;

// -- Growth --

proptest! {
    #[test]
    fn capacity_covers_length(n in 0usize..2_000) {
        let mut array = Array::new();
        let mut copied = 0;
        let mut last_cap = array.capacity();
        for i in 0..n {
            let before = array.len();
            array.push(Value::int(i as i64)).unwrap();
            prop_assert!(array.capacity() >= array.len());
            if array.capacity() != last_cap {
                copied += before;
                last_cap = array.capacity();
            }
        }
        prop_assert!(copied <= 3 * n + 64, "copied {} elements for {} pushes", copied, n);
    }

    #[test]
    fn get_or_grow_reaches_any_index(index in 0isize..5_000) {
        let mut array = Array::new();
        array.get_or_grow(index).unwrap().set_int(1);
        prop_assert_eq!(array.len() as isize, index + 1);
        prop_assert!(array.capacity() >= array.len());
    }
}

// -- Indexing --

proptest! {
    #[test]
    fn negative_index_mirrors_positive(values in prop::collection::vec(any::<i64>(), 1..64)) {
        let array = Array::from_values(values.iter().copied().map(Value::int).collect());
        let len = array.len() as isize;
        prop_assert_eq!(array.get(-1).unwrap(), array.get(len - 1).unwrap());
        for k in 1..=len {
            prop_assert_eq!(array.get(-k).unwrap(), array.get(len - k).unwrap());
        }
        prop_assert!(array.get(-len - 1).is_err());
        prop_assert!(array.get(len).is_err());
    }
}

// -- Round trip --

proptest! {
    #[test]
    fn int_round_trips(i in any::<i64>()) {
        let text = Value::int(i).to_text(false).unwrap().into_owned();
        prop_assert_eq!(text.parse::<i64>().unwrap(), i);
    }

    #[test]
    fn uint_round_trips(u in any::<u64>()) {
        let text = Value::uint(u).to_text(false).unwrap().into_owned();
        prop_assert_eq!(text.parse::<u64>().unwrap(), u);
    }

    #[test]
    fn real_round_trips(r in any::<f64>().prop_filter("finite", |r| r.is_finite())) {
        let text = Value::real(r).to_text(false).unwrap().into_owned();
        let back: f64 = text.parse().unwrap();
        prop_assert_eq!(back.to_bits(), r.to_bits());
        prop_assert!(Value::real(back).equals(&Value::real(r), false));
    }

    #[test]
    fn string_round_trips(s in "[^\\x00]{0,64}") {
        let value = Value::string(&s).unwrap();
        prop_assert_eq!(value.is_mini(), s.len() <= cxl_datum::limits::MINI_STR_CAP);
        prop_assert_eq!(value.to_text(false).unwrap(), s.as_str());
    }

    #[test]
    fn joined_ints_split_back(values in prop::collection::vec(any::<i64>(), 1..32)) {
        let array = Array::from_values(values.iter().copied().map(Value::int).collect());
        let joined = array.join(",").unwrap();
        prop_assert!(joined.status.is_complete());
        let text = joined.value.str_view().unwrap().to_string();

        let parts = Array::split(Delimiter::Byte(b','), &text, -1).unwrap();
        let back: Vec<i64> = parts
            .iter()
            .map(|v| v.str_view().unwrap().parse().unwrap())
            .collect();
        prop_assert_eq!(back, values);
    }
}

// -- Builder --

fn pieces() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..6_000), 0..16)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn append_matches_concatenation(pieces in pieces()) {
        let mut dest = Value::Nil;
        let mut builder = Builder::open(&mut dest, FabMode::Append).unwrap();
        for piece in &pieces {
            builder.put_bytes(piece).unwrap();
        }
        builder.close(CloseKind::Blob).unwrap();
        prop_assert_eq!(&*dest.blob_view().unwrap(), &pieces.concat()[..]);
    }

    #[test]
    fn prepend_matches_reversed_concatenation(pieces in pieces()) {
        let mut dest = Value::Nil;
        let mut builder = Builder::open(&mut dest, FabMode::Prepend).unwrap();
        for piece in &pieces {
            builder.put_bytes(piece).unwrap();
        }
        builder.close(CloseKind::Blob).unwrap();
        let expected: Vec<u8> = pieces.iter().rev().flatten().copied().collect();
        prop_assert_eq!(&*dest.blob_view().unwrap(), &expected[..]);
    }

    #[test]
    fn unput_undoes_trailing_bytes(pieces in pieces(), undo in 0usize..100) {
        let total: Vec<u8> = pieces.concat();
        let undo = undo.min(total.len());
        let mut dest = Value::Nil;
        let mut builder = Builder::open(&mut dest, FabMode::Append).unwrap();
        for piece in &pieces {
            builder.put_bytes(piece).unwrap();
        }
        for _ in 0..undo {
            builder.unput().unwrap();
        }
        builder.close(CloseKind::Blob).unwrap();
        prop_assert_eq!(&*dest.blob_view().unwrap(), &total[..total.len() - undo]);
    }
}
