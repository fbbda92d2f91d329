//! Borrowed views of string and blob payloads.
//!
//! Owned and inline payloads are borrowed directly from the `Value`. A
//! reference variant holds only a weak handle, so its view keeps an owning
//! handle for as long as the view lives.

use std::fmt;
use std::ops::Deref;

use super::heap::Heap;

/// Text of a string value.
pub enum StrView<'a> {
    Borrowed(&'a str),
    Shared(Heap<str>),
}

impl Deref for StrView<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        match self {
            StrView::Borrowed(s) => s,
            StrView::Shared(h) => h,
        }
    }
}

impl fmt::Debug for StrView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl PartialEq<str> for StrView<'_> {
    fn eq(&self, other: &str) -> bool {
        **self == *other
    }
}

impl PartialEq<&str> for StrView<'_> {
    fn eq(&self, other: &&str) -> bool {
        **self == **other
    }
}

/// Bytes of a blob value.
pub enum BlobView<'a> {
    Borrowed(&'a [u8]),
    Shared(Heap<[u8]>),
}

impl Deref for BlobView<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            BlobView::Borrowed(b) => b,
            BlobView::Shared(h) => h,
        }
    }
}

impl fmt::Debug for BlobView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
