//! Splitting strings into arrays.
//!
//! A [`Delimiter`] selects how substrings are separated and `limit` how
//! many are produced:
//!
//! | limit | behavior                                                        |
//! |-------|-----------------------------------------------------------------|
//! | `< 0` | every delimiter is significant; empty substrings are kept       |
//! | `0`   | as above, but trailing empty substrings are dropped             |
//! | `> 0` | at most `limit` elements; the last holds the unsplit remainder  |
//!
//! Whitespace delimiters treat a run of `" \t\n\r\f\v"` as one delimiter;
//! [`Delimiter::Space`] additionally ignores leading whitespace.

use std::str::FromStr;

use cxl_text::parse_delimiter;

use super::Array;
use crate::errors::{invalid_argument, DatumError, DatumResult};
use crate::value::Value;

const WHITESPACE: &[u8] = b" \t\n\r\x0c\x0b";

/// How [`Array::split`] separates substrings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    /// No delimiter: the whole string is one element.
    None,
    /// Runs of whitespace.
    Whitespace,
    /// Runs of whitespace, ignoring leading whitespace.
    Space,
    /// One ASCII byte, taken literally. `b' '` means [`Space`](Self::Space)
    /// and `0` means [`Whitespace`](Self::Whitespace).
    Byte(u8),
    /// One element per character.
    Empty,
}

impl FromStr for Delimiter {
    type Err = DatumError;

    /// Parse a single character or a numeric byte literal (`","`, `"44"`,
    /// `"0x2c"`).
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let byte = parse_delimiter(spec)?;
        Delimiter::Byte(byte).normalized()
    }
}

impl Delimiter {
    fn normalized(self) -> DatumResult<Self> {
        match self {
            Delimiter::Byte(0) => Ok(Delimiter::Whitespace),
            Delimiter::Byte(b' ') => Ok(Delimiter::Space),
            Delimiter::Byte(b) if !b.is_ascii() => Err(invalid_argument(format_args!(
                "delimiter byte {b:#04x} is not ASCII"
            ))),
            other => Ok(other),
        }
    }
}

impl Array {
    /// Split `src` into an array of strings.
    ///
    /// An empty `src` (or one holding only whitespace, for
    /// [`Delimiter::Space`]) yields an empty array.
    #[tracing::instrument(level = "trace", skip(src), fields(len = src.len()))]
    pub fn split(delim: Delimiter, src: &str, limit: i32) -> DatumResult<Array> {
        let delim = delim.normalized()?;
        let mut out = Array::new();
        if src.is_empty() {
            return Ok(out);
        }

        let byte;
        let set: &[u8] = match delim {
            Delimiter::None => &[],
            Delimiter::Whitespace | Delimiter::Space => WHITESPACE,
            Delimiter::Byte(b) => {
                byte = [b];
                &byte
            }
            Delimiter::Empty => return split_chars(src, limit),
        };
        let collapse = set.len() > 1;
        let is_delim = |b: &u8| set.contains(b);
        let bytes = src.as_bytes();

        let mut pos = 0;
        if delim == Delimiter::Space {
            match bytes.iter().position(|b| !is_delim(b)) {
                Some(first) => pos = first,
                None => return Ok(out),
            }
        }

        let mut count = 0;
        loop {
            let start = pos;
            count += 1;
            let found = if limit > 0 && count == limit {
                None
            } else {
                bytes[start..].iter().position(is_delim).map(|i| start + i)
            };
            let Some(at) = found else {
                out.push(Value::string(&src[start..])?)?;
                break;
            };

            // Position of the delimiter consumed with this element.
            let mut next = at;
            if collapse || limit == 0 {
                let mut run_end = at;
                while bytes.get(run_end + 1).is_some_and(is_delim) {
                    run_end += 1;
                }
                if run_end + 1 == bytes.len() {
                    // Delimiters run to the end of the string.
                    if limit == 0 {
                        if at > start {
                            out.push(Value::string(&src[start..at])?)?;
                        }
                        break;
                    }
                    next = run_end;
                } else if collapse {
                    next = run_end;
                }
            }

            out.push(Value::string(&src[start..at])?)?;
            pos = next + 1;
        }
        Ok(out)
    }
}

fn split_chars(src: &str, limit: i32) -> DatumResult<Array> {
    let mut out = Array::new();
    let cap = usize::try_from(limit).ok().filter(|&n| n > 0);
    for (i, (at, c)) in src.char_indices().enumerate() {
        if cap == Some(i + 1) {
            out.push(Value::string(&src[at..])?)?;
            break;
        }
        out.push(Value::char(c)?)?;
    }
    Ok(out)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
