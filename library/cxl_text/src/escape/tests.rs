use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn escaped(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    escape_bytes(bytes, &mut out);
    out
}

#[test]
fn escape_named_controls() {
    assert_eq!(escaped(b"a\tb\nc\\"), b"a\\tb\\nc\\\\".to_vec());
    assert_eq!(escaped(b"\x1b\x0b\x0c\r"), b"\\e\\v\\f\\r".to_vec());
}

#[test]
fn escape_other_controls_as_hex() {
    assert_eq!(escaped(b"\x00\x01\x7f"), b"\\x00\\x01\\x7f".to_vec());
}

#[test]
fn escape_leaves_utf8_alone() {
    assert_eq!(escaped("café".as_bytes()), "café".as_bytes().to_vec());
}

#[test]
fn unescape_named_sequences() {
    let out = unescape(b"a\\tb\\sc\\e", None).unwrap();
    assert_eq!(out.bytes, b"a\tb c\x1b".to_vec());
    assert_eq!(out.consumed, 9);
}

#[test]
fn unescape_numeric_sequences() {
    assert_eq!(unescape(b"\\101\\x41\\0x41\\X4a", None).unwrap().bytes, b"AAAJ".to_vec());
    // Octal stops after three digits.
    assert_eq!(unescape(b"\\1011", None).unwrap().bytes, b"A1".to_vec());
    // Null bytes are legal.
    assert_eq!(unescape(b"\\0", None).unwrap().bytes, vec![0]);
}

#[test]
fn unescape_literal_fallbacks() {
    assert_eq!(unescape(b"\\q\\\"", None).unwrap().bytes, b"q\"".to_vec());
    assert_eq!(unescape(b"\\xZ", None).unwrap().bytes, b"xZ".to_vec());
}

#[test]
fn unescape_stops_at_terminator() {
    let out = unescape(b"ab\\\"c\"rest", Some(b'"')).unwrap();
    assert_eq!(out.bytes, b"ab\"c".to_vec());
    assert_eq!(out.consumed, 5);
}

#[test]
fn unescape_errors() {
    assert!(unescape(b"abc\\", None).is_err());
    assert!(unescape(b"\\777", None).is_err());
}

proptest! {
    #[test]
    fn escape_then_unescape_is_identity(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let decoded = unescape(&escaped(&bytes), None).unwrap();
        prop_assert_eq!(decoded.bytes, bytes);
    }
}
