//! Delimiter specifications.

use crate::errors::{invalid_delimiter, TextResult};

/// Convert a delimiter spec to a byte.
///
/// A spec starting with a digit is a numeric literal in C notation (`44`,
/// `0x2c`, `054`) and must be at most 0xFF. Anything else must be a single
/// ASCII character, taken literally.
pub fn parse_delimiter(spec: &str) -> TextResult<u8> {
    let bytes = spec.as_bytes();
    match bytes {
        [first, ..] if first.is_ascii_digit() => {
            parse_numeric(spec).ok_or_else(|| invalid_delimiter(spec))
        }
        [single] if single.is_ascii() => Ok(*single),
        _ => Err(invalid_delimiter(spec)),
    }
}

fn parse_numeric(spec: &str) -> Option<u8> {
    let (digits, radix) = if let Some(hex) = spec
        .strip_prefix("0x")
        .or_else(|| spec.strip_prefix("0X"))
    {
        (hex, 16)
    } else if spec.len() > 1 && spec.starts_with('0') {
        (&spec[1..], 8)
    } else {
        (spec, 10)
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(digits, radix).ok()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
