//! Inline short strings.

use std::fmt;

use crate::limits::MINI_STR_CAP;

/// A string of at most [`MINI_STR_CAP`] bytes stored inside the `Value`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MiniStr {
    len: u8,
    buf: [u8; MINI_STR_CAP],
}

impl MiniStr {
    /// The empty (null) string.
    pub const EMPTY: MiniStr = MiniStr {
        len: 0,
        buf: [0; MINI_STR_CAP],
    };

    /// Store `s` inline, or return `None` if it is too long.
    pub fn new(s: &str) -> Option<Self> {
        let len = u8::try_from(s.len()).ok().filter(|&n| usize::from(n) <= MINI_STR_CAP)?;
        let mut buf = [0; MINI_STR_CAP];
        buf[..s.len()].copy_from_slice(s.as_bytes());
        Some(MiniStr { len, buf })
    }

    /// Store a single character inline.
    pub fn from_char(c: char) -> Self {
        let mut utf8 = [0; 4];
        let s = c.encode_utf8(&mut utf8);
        // A char encodes to at most 4 bytes.
        Self::new(s).unwrap_or(Self::EMPTY)
    }

    pub fn as_str(&self) -> &str {
        // Only ever filled from a `&str`, so the bytes are valid UTF-8.
        std::str::from_utf8(&self.buf[..usize::from(self.len)]).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for MiniStr {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for MiniStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}
