//! Backslash escaping and unescaping.
//!
//! [`escape_byte`] produces sequences that [`unescape`] decodes back to the
//! original byte, so escaped text round-trips:
//!
//! | sequence      | byte                         |
//! |---------------|------------------------------|
//! | `\t` `\n` `\v` `\f` `\r` | 0x09 0x0A 0x0B 0x0C 0x0D |
//! | `\e`          | 0x1B (escape)                |
//! | `\s`          | 0x20 (space, decode only)    |
//! | `\\`          | backslash                    |
//! | `\nnn`        | octal, 1-3 digits            |
//! | `\xNN` `\0xNN`| hex, 1-2 digits              |
//! | `\?`          | `?` itself, for any other `?` |

use crate::errors::{invalid_escape, TextResult};

const HEX_LOWER: &[u8; 16] = b"0123456789abcdef";

/// Append byte `b` to `out` in backslash-escaped form.
///
/// Control bytes and DEL are escaped; bytes 0x80 and above pass through so
/// that UTF-8 text stays readable.
pub fn escape_byte(b: u8, out: &mut Vec<u8>) {
    let named = match b {
        b'\\' => b'\\',
        b'\t' => b't',
        b'\n' => b'n',
        0x0B => b'v',
        0x0C => b'f',
        b'\r' => b'r',
        0x1B => b'e',
        0x00..=0x1F | 0x7F => {
            out.extend_from_slice(&[
                b'\\',
                b'x',
                HEX_LOWER[usize::from(b >> 4)],
                HEX_LOWER[usize::from(b & 0x0F)],
            ]);
            return;
        }
        _ => {
            out.push(b);
            return;
        }
    };
    out.extend_from_slice(&[b'\\', named]);
}

/// Append every byte of `bytes` to `out` in backslash-escaped form.
pub fn escape_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    for &b in bytes {
        escape_byte(b, out);
    }
}

/// Output of [`unescape`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unescaped {
    /// The decoded bytes.
    pub bytes: Vec<u8>,
    /// Number of source bytes consumed; points at the terminator if one was hit.
    pub consumed: usize,
}

/// Decode backslash escape sequences in `src`.
///
/// Scanning stops at the end of `src` or at the first unescaped `term` byte.
/// A trailing lone backslash or a numeric sequence above 0xFF is an error.
pub fn unescape(src: &[u8], term: Option<u8>) -> TextResult<Unescaped> {
    let mut bytes = Vec::with_capacity(src.len());
    let mut pos = 0;

    while let Some(&c) = src.get(pos) {
        if Some(c) == term {
            break;
        }
        pos += 1;
        if c != b'\\' {
            bytes.push(c);
            continue;
        }

        let Some(&code) = src.get(pos) else {
            return Err(invalid_escape());
        };
        pos += 1;
        let decoded = match code {
            b't' => b'\t',
            b'r' => b'\r',
            b'n' => b'\n',
            b'e' => 0x1B,
            b's' => b' ',
            b'f' => 0x0C,
            b'v' => 0x0B,
            b'x' | b'X' => decode_number(src, &mut pos, 16, 2)?.unwrap_or(code),
            b'0' if src.get(pos) == Some(&b'x') => {
                pos += 1;
                // No digits after `\0x`: the `x` stands for itself.
                decode_number(src, &mut pos, 16, 2)?.unwrap_or(b'x')
            }
            b'0'..=b'7' => {
                pos -= 1;
                decode_number(src, &mut pos, 8, 3)?.unwrap_or(code)
            }
            other => other,
        };
        bytes.push(decoded);
    }

    Ok(Unescaped {
        bytes,
        consumed: pos,
    })
}

/// Decode up to `max_len` digits in `radix` starting at `*pos`.
///
/// Returns `None` when no digit was found.
fn decode_number(src: &[u8], pos: &mut usize, radix: u32, max_len: usize) -> TextResult<Option<u8>> {
    let start = *pos;
    let mut value: u32 = 0;

    while *pos - start < max_len {
        let Some(digit) = src.get(*pos).and_then(|&b| char::from(b).to_digit(radix)) else {
            break;
        };
        value = value * radix + digit;
        if value > 0xFF {
            return Err(invalid_escape());
        }
        *pos += 1;
    }

    if *pos == start {
        Ok(None)
    } else {
        Ok(u8::try_from(value).ok())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
