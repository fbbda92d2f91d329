//! Universal tagged values.
//!
//! # Ownership
//!
//! Owned payloads (`Str`, `Blob`, `Array`) are dropped when the `Value` is
//! cleared or overwritten. Reference payloads (`StrRef`, `BlobRef`,
//! `ArrayRef`) own nothing: the caller keeps the referent alive, and a
//! reference that outlives it reports `DanglingReference` on access.
//!
//! Strings of at most [`MINI_STR_CAP`] bytes are stored inline (`MiniStr`)
//! when set by copy, so they never allocate.
//!
//! Strings are UTF-8 and may not contain NUL bytes; blobs may hold anything.
//!
//! `Value` is deliberately not `Clone`. Use [`Value::deep_copy`] for a copy
//! and [`Value::transfer`] to move a payload out in O(1).

mod compare;
mod copy;
mod heap;
mod mini;
mod views;

use std::borrow::Cow;
use std::fmt;
use std::mem;

use cxl_text::{shell_quote, VizFlags};

pub use heap::{Heap, HeapRef};
pub use mini::MiniStr;
pub use views::{BlobView, StrView};

pub(crate) use compare::arrays_equal;
pub(crate) use copy::{clone_array, clone_range};

use crate::array::{Array, ArrayHandle, ArrayRef, RenderOptions};
use crate::builder::{Builder, CloseKind, ConvFlags, FabMode};
use crate::errors::{
    embedded_nul, invalid_argument, invalid_operation, type_mismatch, DatumResult,
};
use crate::limits::MINI_STR_CAP;

/// A nil, boolean, numeric, string, blob or array value.
#[derive(Debug, Default)]
pub enum Value {
    /// No value.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Real(f64),
    /// Short string stored inline.
    MiniStr(MiniStr),
    /// Owned heap string.
    Str(Heap<str>),
    /// Borrowed string owned elsewhere.
    StrRef(HeapRef<str>),
    /// Owned byte blob.
    Blob(Heap<[u8]>),
    /// Borrowed blob owned elsewhere.
    BlobRef(HeapRef<[u8]>),
    /// Owned array.
    Array(ArrayHandle),
    /// Borrowed array owned elsewhere.
    ArrayRef(ArrayRef),
}

/// Kind of a [`Value`], ignoring storage details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Int,
    UInt,
    Real,
    Str,
    Blob,
    Array,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::UInt => "uint",
            ValueKind::Real => "real",
            ValueKind::Str => "string",
            ValueKind::Blob => "blob",
            ValueKind::Array => "array",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owning handle handed back by [`Value::release`].
#[derive(Debug)]
pub enum Released {
    Str(Heap<str>),
    Blob(Heap<[u8]>),
    Array(ArrayHandle),
}

fn check_text(s: &str) -> DatumResult<()> {
    if s.as_bytes().contains(&0) {
        return Err(embedded_nul());
    }
    Ok(())
}

impl Value {
    // Factory methods

    #[inline]
    pub fn nil() -> Self {
        Value::Nil
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    #[inline]
    pub fn int(i: i64) -> Self {
        Value::Int(i)
    }

    #[inline]
    pub fn uint(u: u64) -> Self {
        Value::UInt(u)
    }

    #[inline]
    pub fn real(r: f64) -> Self {
        Value::Real(r)
    }

    /// The null (empty) string.
    #[inline]
    pub fn null() -> Self {
        Value::MiniStr(MiniStr::EMPTY)
    }

    /// A one-character string, always stored inline.
    pub fn char(c: char) -> DatumResult<Self> {
        if c == '\0' {
            return Err(embedded_nul());
        }
        Ok(Value::MiniStr(MiniStr::from_char(c)))
    }

    /// A string copied from `s`, inline if short enough.
    pub fn string(s: &str) -> DatumResult<Self> {
        check_text(s)?;
        Ok(Self::text(s))
    }

    /// A blob copied from `bytes`.
    pub fn blob(bytes: &[u8]) -> Self {
        Value::Blob(Heap::from(bytes))
    }

    /// An owned array.
    pub fn array(array: Array) -> Self {
        Value::Array(ArrayHandle::new(array))
    }

    /// String value for text already known to be free of NUL bytes.
    pub(crate) fn text(s: &str) -> Self {
        match MiniStr::new(s) {
            Some(mini) => Value::MiniStr(mini),
            None => Value::Str(Heap::from(s)),
        }
    }

    /// String value that takes over `s`, inline if short enough.
    pub(crate) fn text_owned(s: String) -> Self {
        if s.len() <= MINI_STR_CAP {
            Self::text(&s)
        } else {
            Value::Str(Heap::from(s))
        }
    }

    // Setters

    /// Drop any payload and become nil. Clearing nil is a no-op.
    #[inline]
    pub fn clear(&mut self) {
        *self = Value::Nil;
    }

    #[inline]
    pub fn set_nil(&mut self) {
        self.clear();
    }

    #[inline]
    pub fn set_bool(&mut self, b: bool) {
        *self = Value::Bool(b);
    }

    #[inline]
    pub fn set_int(&mut self, i: i64) {
        *self = Value::Int(i);
    }

    #[inline]
    pub fn set_uint(&mut self, u: u64) {
        *self = Value::UInt(u);
    }

    #[inline]
    pub fn set_real(&mut self, r: f64) {
        *self = Value::Real(r);
    }

    #[inline]
    pub fn set_null(&mut self) {
        *self = Value::null();
    }

    pub fn set_char(&mut self, c: char) -> DatumResult<()> {
        *self = Value::char(c)?;
        Ok(())
    }

    /// Copy `s` into this value. The previous payload is kept on error.
    pub fn set_str(&mut self, s: &str) -> DatumResult<()> {
        *self = Value::string(s)?;
        Ok(())
    }

    /// Copy the first `len` bytes of `s`.
    ///
    /// `len` must not exceed `s.len()` and must fall on a character boundary.
    pub fn set_substr(&mut self, s: &str, len: usize) -> DatumResult<()> {
        let sub = s.get(..len).ok_or_else(|| {
            invalid_argument(format_args!(
                "substring length {len} invalid for string of {} bytes",
                s.len()
            ))
        })?;
        self.set_str(sub)
    }

    /// Take ownership of a heap string. Always stored on the heap, even
    /// when short.
    ///
    /// A [`Heap<str>`] is installed as is, sharing its payload. A `String`
    /// is moved into a single new heap allocation, which copies its bytes
    /// once.
    pub fn adopt_str(&mut self, s: impl Into<Heap<str>>) -> DatumResult<()> {
        let heap = s.into();
        check_text(&heap)?;
        *self = Value::Str(heap);
        Ok(())
    }

    /// Refer to a string owned elsewhere.
    pub fn set_str_ref(&mut self, s: &Heap<str>) -> DatumResult<()> {
        check_text(s)?;
        *self = Value::StrRef(s.downgrade());
        Ok(())
    }

    pub fn set_blob(&mut self, bytes: &[u8]) {
        *self = Value::blob(bytes);
    }

    /// Take ownership of a heap blob.
    ///
    /// A [`Heap<[u8]>`](Heap) is installed as is; a `Vec<u8>` is moved into a
    /// single new heap allocation, which copies its bytes once.
    pub fn adopt_blob(&mut self, bytes: impl Into<Heap<[u8]>>) {
        *self = Value::Blob(bytes.into());
    }

    /// Refer to a blob owned elsewhere.
    pub fn set_blob_ref(&mut self, bytes: &Heap<[u8]>) {
        *self = Value::BlobRef(bytes.downgrade());
    }

    /// Take ownership of `array`.
    pub fn set_array(&mut self, array: Array) {
        *self = Value::array(array);
    }

    /// Take ownership of an array already behind a handle.
    pub fn set_array_handle(&mut self, handle: ArrayHandle) {
        *self = Value::Array(handle);
    }

    /// Refer to an array owned elsewhere.
    pub fn set_array_ref(&mut self, handle: &ArrayHandle) {
        *self = Value::ArrayRef(handle.downgrade());
    }

    /// Store a deep copy of `array`.
    pub fn set_array_copy(&mut self, array: &Array) -> DatumResult<()> {
        *self = Value::array(array.deep_clone()?);
        Ok(())
    }

    /// Turn an owned heap payload into a reference to it, without copying.
    ///
    /// The returned handle now owns the payload; this value refers to it.
    /// Inline strings, scalars and values that are already references have
    /// nothing to release and fail with `InvalidOperation`.
    pub fn release(&mut self) -> DatumResult<Released> {
        match mem::take(self) {
            Value::Str(heap) => {
                *self = Value::StrRef(heap.downgrade());
                Ok(Released::Str(heap))
            }
            Value::Blob(heap) => {
                *self = Value::BlobRef(heap.downgrade());
                Ok(Released::Blob(heap))
            }
            Value::Array(handle) => {
                *self = Value::ArrayRef(handle.downgrade());
                Ok(Released::Array(handle))
            }
            other => {
                let kind = if other.is_ref() {
                    "reference"
                } else if other.is_mini() {
                    "inline string"
                } else {
                    other.type_name()
                };
                *self = other;
                Err(invalid_operation(format_args!(
                    "cannot release {kind} value (no heap payload)"
                )))
            }
        }
    }

    /// Move the payload out in O(1), leaving nil behind.
    #[inline]
    pub fn transfer(&mut self) -> Value {
        mem::take(self)
    }

    /// Replace this value with `src`'s payload, leaving `src` nil.
    #[inline]
    pub fn transfer_from(&mut self, src: &mut Value) {
        *self = mem::take(src);
    }

    /// Store the visible form of `bytes` (see [`cxl_text::viz_byte`]) as a string.
    pub fn set_visible(&mut self, bytes: &[u8], flags: VizFlags) -> DatumResult<()> {
        let mut builder = Builder::open(self, FabMode::Clear)?;
        builder.put_converted(bytes, ConvFlags::VIZ | ConvFlags::from_viz(flags))?;
        builder.close(CloseKind::Text)
    }

    /// Store `s` quoted for a POSIX shell.
    pub fn set_shell_quoted(&mut self, s: &str) -> DatumResult<()> {
        let mut quoted = Vec::with_capacity(s.len() + 2);
        shell_quote(s.as_bytes(), &mut quoted);
        let mut builder = Builder::open(self, FabMode::Clear)?;
        builder.put_bytes(&quoted)?;
        builder.close(CloseKind::Text)
    }

    // Queries

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Real(_) => ValueKind::Real,
            Value::MiniStr(_) | Value::Str(_) | Value::StrRef(_) => ValueKind::Str,
            Value::Blob(_) | Value::BlobRef(_) => ValueKind::Blob,
            Value::Array(_) | Value::ArrayRef(_) => ValueKind::Array,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    #[inline]
    pub fn is_false(&self) -> bool {
        matches!(self, Value::Bool(false))
    }

    /// True for an empty string of any storage kind.
    pub fn is_null(&self) -> bool {
        self.str_view().is_ok_and(|s| s.is_empty())
    }

    #[inline]
    pub fn is_str(&self) -> bool {
        self.kind() == ValueKind::Str
    }

    #[inline]
    pub fn is_blob(&self) -> bool {
        self.kind() == ValueKind::Blob
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.kind() == ValueKind::Array
    }

    #[inline]
    pub fn is_mini(&self) -> bool {
        matches!(self, Value::MiniStr(_))
    }

    #[inline]
    pub fn is_ref(&self) -> bool {
        matches!(self, Value::StrRef(_) | Value::BlobRef(_) | Value::ArrayRef(_))
    }

    pub fn as_bool(&self) -> DatumResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(type_mismatch("bool", other.type_name())),
        }
    }

    pub fn as_int(&self) -> DatumResult<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(type_mismatch("int", other.type_name())),
        }
    }

    pub fn as_uint(&self) -> DatumResult<u64> {
        match self {
            Value::UInt(u) => Ok(*u),
            other => Err(type_mismatch("uint", other.type_name())),
        }
    }

    pub fn as_real(&self) -> DatumResult<f64> {
        match self {
            Value::Real(r) => Ok(*r),
            other => Err(type_mismatch("real", other.type_name())),
        }
    }

    /// Text of a string value.
    pub fn str_view(&self) -> DatumResult<StrView<'_>> {
        match self {
            Value::MiniStr(mini) => Ok(StrView::Borrowed(mini.as_str())),
            Value::Str(heap) => Ok(StrView::Borrowed(heap)),
            Value::StrRef(weak) => weak.upgrade().map(StrView::Shared),
            other => Err(type_mismatch("string", other.type_name())),
        }
    }

    /// Bytes of a blob value.
    pub fn blob_view(&self) -> DatumResult<BlobView<'_>> {
        match self {
            Value::Blob(heap) => Ok(BlobView::Borrowed(heap)),
            Value::BlobRef(weak) => weak.upgrade().map(BlobView::Shared),
            other => Err(type_mismatch("blob", other.type_name())),
        }
    }

    /// Handle to the array held or referenced by this value.
    pub fn array_handle(&self) -> DatumResult<ArrayHandle> {
        match self {
            Value::Array(handle) => Ok(handle.clone()),
            Value::ArrayRef(weak) => ArrayHandle::from_ref(weak),
            other => Err(type_mismatch("array", other.type_name())),
        }
    }

    /// Text form of a scalar or string value.
    ///
    /// Nil is `"nil"` when `show_nil` is set and empty otherwise. Blobs and
    /// arrays have no plain text form; render arrays with [`Array::render`].
    pub fn to_text(&self, show_nil: bool) -> DatumResult<Cow<'_, str>> {
        Ok(match self {
            Value::Nil => Cow::Borrowed(if show_nil { "nil" } else { "" }),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Int(i) => Cow::Owned(i.to_string()),
            Value::UInt(u) => Cow::Owned(u.to_string()),
            Value::Real(r) => Cow::Owned(format_real(*r)),
            Value::MiniStr(mini) => Cow::Borrowed(mini.as_str()),
            Value::Str(heap) => Cow::Borrowed(&**heap),
            Value::StrRef(weak) => Cow::Owned(weak.upgrade()?.to_string()),
            other => return Err(type_mismatch("string", other.type_name())),
        })
    }
}

/// Shortest text that parses back to the same real.
pub(crate) fn format_real(r: f64) -> String {
    format!("{r:?}")
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, false)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = Value::Nil;
        let mut builder = Builder::open(&mut out, FabMode::Clear).map_err(|_| fmt::Error)?;
        let _status = builder
            .put_value(self, &RenderOptions::inspect())
            .map_err(|_| fmt::Error)?;
        builder.close(CloseKind::Auto).map_err(|_| fmt::Error)?;
        match &out {
            Value::Blob(bytes) => {
                let mut visible = Vec::with_capacity(bytes.len());
                cxl_text::viz_bytes(bytes, VizFlags::empty(), &mut visible);
                f.write_str(&String::from_utf8_lossy(&visible))
            }
            text => f.write_str(&text.to_text(false).map_err(|_| fmt::Error)?),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::UInt(u)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::array(array)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
