use super::*;
use pretty_assertions::assert_eq;

fn viz(bytes: &[u8], flags: VizFlags) -> String {
    let mut out = Vec::new();
    viz_bytes(bytes, flags, &mut out);
    String::from_utf8(out).unwrap_or_default()
}

#[test]
fn printable_bytes_pass_through() {
    assert_eq!(viz(b"abc XYZ ~!", VizFlags::empty()), "abc XYZ ~!");
}

#[test]
fn named_controls() {
    assert_eq!(viz(b"\n\r\x1b", VizFlags::empty()), "<NL><CR><ESC>");
}

#[test]
fn caret_controls() {
    assert_eq!(viz(b"\t\x01\x00\x7f", VizFlags::empty()), "^I^A^@^?");
}

#[test]
fn space_flag() {
    assert_eq!(viz(b"a b", VizFlags::SPACE), "a<SPC>b");
    assert_eq!(viz(b"a b", VizFlags::empty()), "a b");
}

#[test]
fn eight_bit_bases() {
    assert_eq!(viz(&[0xE9], VizFlags::empty()), "<E9>");
    assert_eq!(viz(&[0xE9], VizFlags::LOWER_HEX), "<e9>");
    assert_eq!(viz(&[0xE9], VizFlags::OCTAL), "<351>");
    assert_eq!(viz(&[0x80], VizFlags::OCTAL | VizFlags::LOWER_HEX), "<200>");
}
