use std::fmt::Write as _;

use cxl_text::VizFlags;

use super::*;
use crate::array::ArrayHandle;
use crate::errors::DatumErrorKind;
use pretty_assertions::assert_eq;

fn text(value: &Value) -> String {
    value.str_view().unwrap().to_string()
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}

#[test]
fn clear_discards_existing_content() {
    let mut dest = Value::string("old").unwrap();
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.put_str("new").unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "new");
}

#[test]
fn append_keeps_existing_string() {
    let mut dest = Value::string("foo").unwrap();
    let mut builder = Builder::open(&mut dest, FabMode::Append).unwrap();
    builder.put_str("bar").unwrap();
    builder.put_byte(b'!').unwrap();
    assert_eq!(builder.len(), 7);
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "foobar!");
}

#[test]
fn append_to_non_string_clears() {
    let mut dest = Value::int(12);
    let mut builder = Builder::open(&mut dest, FabMode::Append).unwrap();
    assert_eq!(builder.mode(), FabMode::Clear);
    builder.put_str("x").unwrap();
    builder.close(CloseKind::Auto).unwrap();
    assert_eq!(text(&dest), "x");
}

#[test]
fn prepend_puts_land_in_front() {
    let mut dest = Value::string("world").unwrap();
    let mut builder = Builder::open(&mut dest, FabMode::Prepend).unwrap();
    builder.put_str("lo ").unwrap();
    builder.put_str("hel").unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "hello world");
}

#[test]
fn prepend_keeps_each_put_in_reading_order() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Prepend).unwrap();
    builder.put_bytes(b"cd").unwrap();
    builder.put_char('é').unwrap();
    builder.put_bytes(b"ab").unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "abécd");
}

#[test]
fn append_spanning_many_chunks() {
    let data = pattern(3 * CHUNK_SIZE_MAX + 123);
    let mut dest = Value::string("head:").unwrap();
    let mut builder = Builder::open(&mut dest, FabMode::Append).unwrap();
    for piece in data.chunks(1000) {
        builder.put_bytes(piece).unwrap();
    }
    assert!(builder.chunks.len() >= 3);
    builder.close(CloseKind::Text).unwrap();

    let mut expected = b"head:".to_vec();
    expected.extend_from_slice(&data);
    assert_eq!(text(&dest).as_bytes(), &expected[..]);
}

#[test]
fn prepend_spanning_many_chunks() {
    let data = pattern(2 * CHUNK_SIZE_MAX + 77);
    let mut dest = Value::string(":tail").unwrap();
    let mut builder = Builder::open(&mut dest, FabMode::Prepend).unwrap();
    for &b in &data {
        builder.put_byte(b).unwrap();
    }
    builder.close(CloseKind::Text).unwrap();

    let mut expected: Vec<u8> = data.iter().rev().copied().collect();
    expected.extend_from_slice(b":tail");
    assert_eq!(text(&dest).as_bytes(), &expected[..]);
}

#[test]
fn large_existing_content_becomes_a_chunk() {
    let existing = String::from_utf8(pattern(CHUNK_SIZE_MAX + 5)).unwrap();
    let mut dest = Value::string(&existing).unwrap();
    let mut builder = Builder::open(&mut dest, FabMode::Prepend).unwrap();
    assert_eq!(builder.chunks.len(), 1);
    builder.put_str(">>").unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), format!(">>{existing}"));
}

#[test]
fn window_growth_follows_curve() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.put_byte(b'x').unwrap();
    assert_eq!(builder.window_cap, CHUNK_SIZE_0);
    builder.put_bytes(&pattern(CHUNK_SIZE_0)).unwrap();
    assert_eq!(builder.window_cap, 2 * CHUNK_SIZE_0);
    builder.put_bytes(&pattern(CHUNK_SIZE_4)).unwrap();
    assert_eq!(builder.window_cap, 4 * CHUNK_SIZE_4);
    assert!(builder.chunks.is_empty());
}

#[test]
fn unput_removes_last_byte() {
    let mut dest = Value::string("ab").unwrap();
    let mut builder = Builder::open(&mut dest, FabMode::Append).unwrap();
    builder.put_str("cd").unwrap();
    builder.unput().unwrap();
    builder.unput().unwrap();
    let err = builder.unput().unwrap_err();
    assert_eq!(err.kind, DatumErrorKind::Empty);
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "ab");
}

#[test]
fn unput_in_prepend_mode_removes_front_byte() {
    let mut dest = Value::string("tail").unwrap();
    let mut builder = Builder::open(&mut dest, FabMode::Prepend).unwrap();
    builder.put_str("xy").unwrap();
    builder.unput().unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "ytail");
}

#[test]
fn unput_reaches_into_committed_chunk() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.put_bytes(&pattern(CHUNK_SIZE_MAX)).unwrap();
    builder.put_byte(b'!').unwrap();
    assert_eq!(builder.chunks.len(), 1);
    builder.unput().unwrap();
    builder.unput().unwrap();
    assert!(builder.chunks.is_empty());
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest).as_bytes(), &pattern(CHUNK_SIZE_MAX - 1)[..]);
}

#[test]
fn unput_on_fresh_builder_is_empty() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    assert_eq!(builder.unput().unwrap_err().kind, DatumErrorKind::Empty);
}

#[test]
fn close_without_data() {
    let mut dest = Value::int(3);
    let builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.close(CloseKind::Auto).unwrap();
    assert!(dest.is_null());

    let builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.close(CloseKind::Blob).unwrap();
    assert!(dest.is_blob());
    assert!(dest.blob_view().unwrap().is_empty());
}

#[test]
fn close_text_rejects_binary() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.put_bytes(b"a\0b").unwrap();
    let err = builder.close(CloseKind::Text).unwrap_err();
    assert_eq!(err.kind, DatumErrorKind::EncodingError);
    assert!(dest.is_nil());

    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.put_bytes(&[0xFF, 0xFE]).unwrap();
    let err = builder.close(CloseKind::Text).unwrap_err();
    assert_eq!(err.kind, DatumErrorKind::EncodingError);
}

#[test]
fn close_auto_classifies_binary_as_blob() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.put_bytes(b"a\0b").unwrap();
    builder.close(CloseKind::Auto).unwrap();
    assert_eq!(&*dest.blob_view().unwrap(), b"a\0b");

    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.put_bytes(&[b'x', 0xC3]).unwrap();
    builder.close(CloseKind::Auto).unwrap();
    assert!(dest.is_blob());

    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.put_str("short").unwrap();
    builder.close(CloseKind::Auto).unwrap();
    assert!(dest.is_mini());
}

#[test]
fn close_blob_keeps_text_bytes() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.put_str("plain").unwrap();
    builder.close(CloseKind::Blob).unwrap();
    assert_eq!(&*dest.blob_view().unwrap(), b"plain");
}

#[test]
fn fmt_write_and_put_fmt() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    write!(builder, "{}-{}", 1, "two").unwrap();
    builder.put_fmt(format_args!("/{:03}", 7)).unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "1-two/007");
}

#[test]
fn converted_quote_and_escape() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder
        .put_converted(b"a\"b\\c\n\x01", ConvFlags::DQUOTE | ConvFlags::ESCAPE)
        .unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), r#""a\"b\\c\n\x01""#);
}

#[test]
fn converted_single_quote_leaves_double_quote() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder.put_converted(b"it's \"x\"", ConvFlags::SQUOTE).unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), r#"'it\'s "x"'"#);
}

#[test]
fn converted_visible_forms() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder
        .put_converted(&[b'a', 0x01, 0xE9, b' ', b'\n'], ConvFlags::VIZ | ConvFlags::SHOW_SPACE)
        .unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "a^A<E9><SPC><NL>");

    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    builder
        .put_converted(&[0xE9], ConvFlags::VIZ | ConvFlags::from_viz(VizFlags::OCTAL))
        .unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "<351>");
}

#[test]
fn converted_rejects_bad_combinations() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    let err = builder
        .put_converted(b"x", ConvFlags::DQUOTE | ConvFlags::SQUOTE)
        .unwrap_err();
    assert_eq!(err.kind, DatumErrorKind::InvalidArgument);

    let mut other = Value::Nil;
    let mut builder = Builder::open(&mut other, FabMode::Prepend).unwrap();
    let err = builder.put_converted(b"x", ConvFlags::VIZ).unwrap_err();
    assert_eq!(err.kind, DatumErrorKind::InvalidOperation);
}

#[test]
fn viz_flags_round_trip() {
    let viz = VizFlags::LOWER_HEX | VizFlags::SPACE;
    assert_eq!(ConvFlags::from_viz(viz).viz_flags(), viz);
}

#[test]
fn put_value_in_prepend_mode_keeps_rendered_order() {
    let mut array = Array::new();
    array.push(Value::int(1)).unwrap();
    array.push(Value::string("two").unwrap()).unwrap();
    let value = Value::array(array);

    let mut dest = Value::string("!").unwrap();
    let mut builder = Builder::open(&mut dest, FabMode::Prepend).unwrap();
    let status = builder.put_value(&value, &RenderOptions::inspect()).unwrap();
    assert!(status.is_complete());
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), r#"[1, "two"]!"#);
}

#[test]
fn put_value_scalar() {
    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    let _ = builder.put_value(&Value::real(1.5), &RenderOptions::default()).unwrap();
    builder.put_byte(b' ').unwrap();
    let _ = builder.put_value(&Value::Nil, &RenderOptions::inspect()).unwrap();
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "1.5 nil");
}

#[test]
fn put_value_of_locked_array_renders_placeholder() {
    let handle = ArrayHandle::new(Array::from_values(vec![Value::int(1)]));
    let _lock = handle.try_borrow_mut().unwrap();
    let value = Value::Array(handle.clone());

    let mut dest = Value::Nil;
    let mut builder = Builder::open(&mut dest, FabMode::Clear).unwrap();
    let status = builder.put_value(&value, &RenderOptions::inspect()).unwrap();
    assert_eq!(status, RenderStatus::RecursionDetected);
    builder.close(CloseKind::Text).unwrap();
    assert_eq!(text(&dest), "[...]");

    assert_eq!(value.to_string(), "[...]");
}

#[test]
fn dangling_destination_reference_fails_open() {
    let heap: Heap<str> = Heap::from("gone soon");
    let mut dest = Value::Nil;
    dest.set_str_ref(&heap).unwrap();
    drop(heap);
    let err = Builder::open(&mut dest, FabMode::Append).unwrap_err();
    assert_eq!(err.kind, DatumErrorKind::DanglingReference);
}
