//! Rendering values and arrays as text.
//!
//! Array elements are joined with the delimiter from [`RenderOptions`].
//! Top-level arrays are bracketed only with [`RenderFlags::BRACKETS`];
//! nested arrays are always bracketed so their structure stays visible.
//!
//! An array that contains itself is rendered once; the inner occurrence
//! is replaced by [`RECURSION_PLACEHOLDER`] and the render reports
//! [`RenderStatus::RecursionDetected`]. The status is not an error: output
//! is still produced. It is folded upward through every nested call, so the
//! outermost caller always sees it.

use bitflags::bitflags;

use super::Array;
use crate::builder::{Builder, CloseKind, ConvFlags, FabMode};
use crate::cycle::CycleGuard;
use crate::errors::{DatumErrorKind, DatumResult};
use crate::value::{format_real, Value};

/// Text emitted in place of an array already being rendered.
pub const RECURSION_PLACEHOLDER: &str = "[...]";

bitflags! {
    /// Options for rendering values.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u8 {
        /// Wrap the top-level array in `[` `]`.
        const BRACKETS = 0b0001;
        /// Render nil as `nil` instead of nothing.
        const SHOW_NIL = 0b0010;
        /// Double-quote strings, escaping their contents.
        const QUOTE = 0b0100;
        /// Show control and 8-bit bytes in visible form.
        const VIZ = 0b1000;
    }
}

/// Delimiter and flags for a render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub delim: String,
    pub flags: RenderFlags,
}

impl RenderOptions {
    pub fn new(delim: impl Into<String>) -> Self {
        RenderOptions {
            delim: delim.into(),
            flags: RenderFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Unambiguous form: `[1, "two", nil]`.
    pub fn inspect() -> Self {
        RenderOptions::new(", ")
            .with_flags(RenderFlags::BRACKETS | RenderFlags::SHOW_NIL | RenderFlags::QUOTE)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions::new(", ")
    }
}

/// Outcome of a render that did not fail.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    Complete,
    /// An array contained itself and was truncated with a placeholder.
    RecursionDetected,
}

impl RenderStatus {
    pub fn is_complete(self) -> bool {
        self == RenderStatus::Complete
    }

    /// Combine two statuses; recursion anywhere wins.
    #[must_use]
    pub fn merge(self, other: RenderStatus) -> RenderStatus {
        if self.is_complete() {
            other
        } else {
            self
        }
    }
}

/// A rendered value together with the render status.
#[derive(Debug)]
pub struct Rendered {
    pub value: Value,
    pub status: RenderStatus,
}

impl Array {
    /// Render into an open builder.
    pub fn render_into(&self, builder: &mut Builder<'_>, opts: &RenderOptions) -> DatumResult<RenderStatus> {
        builder.put_array(self, opts)
    }

    /// Render into a new string (or blob, if an element puts binary data).
    pub fn render(&self, opts: &RenderOptions) -> DatumResult<Rendered> {
        let mut value = Value::Nil;
        let mut builder = Builder::open(&mut value, FabMode::Clear)?;
        let status = self.render_into(&mut builder, opts)?;
        builder.close(CloseKind::Auto)?;
        Ok(Rendered { value, status })
    }

    /// Join elements with `delim`; nil elements contribute nothing.
    pub fn join(&self, delim: &str) -> DatumResult<Rendered> {
        self.render(&RenderOptions::new(delim))
    }
}

pub(crate) fn render_value(
    builder: &mut Builder<'_>,
    value: &Value,
    opts: &RenderOptions,
    guard: &mut CycleGuard,
) -> DatumResult<RenderStatus> {
    let flags = opts.flags;
    match value {
        Value::Nil => {
            if flags.contains(RenderFlags::SHOW_NIL) {
                builder.put_str("nil")?;
            }
        }
        Value::Bool(b) => builder.put_str(if *b { "true" } else { "false" })?,
        Value::Int(i) => builder.put_fmt(format_args!("{i}"))?,
        Value::UInt(u) => builder.put_fmt(format_args!("{u}"))?,
        Value::Real(r) => builder.put_str(&format_real(*r))?,
        Value::MiniStr(_) | Value::Str(_) | Value::StrRef(_) => {
            let text = value.str_view()?;
            put_payload(builder, text.as_bytes(), flags, flags.contains(RenderFlags::QUOTE))?;
        }
        Value::Blob(_) | Value::BlobRef(_) => {
            let bytes = value.blob_view()?;
            put_payload(builder, &bytes, flags, false)?;
        }
        Value::Array(_) | Value::ArrayRef(_) => {
            let handle = value.array_handle()?;
            return match handle.try_borrow() {
                Ok(array) => render_array(builder, &array, opts, guard, true),
                // Mutably borrowed: the array is being modified by a caller
                // that reached this render through it.
                Err(_) => put_placeholder(builder),
            };
        }
    }
    Ok(RenderStatus::Complete)
}

fn put_payload(builder: &mut Builder<'_>, bytes: &[u8], flags: RenderFlags, quote: bool) -> DatumResult<()> {
    let mut conv = ConvFlags::empty();
    if quote {
        conv |= ConvFlags::DQUOTE | ConvFlags::ESCAPE;
    }
    if flags.contains(RenderFlags::VIZ) {
        conv |= ConvFlags::VIZ;
    }
    if conv.is_empty() {
        builder.put_bytes(bytes)
    } else {
        builder.put_converted(bytes, conv)
    }
}

pub(crate) fn render_array(
    builder: &mut Builder<'_>,
    array: &Array,
    opts: &RenderOptions,
    guard: &mut CycleGuard,
    bracketed: bool,
) -> DatumResult<RenderStatus> {
    let visited = guard.visit(array.addr(), |guard| {
        let mut status = RenderStatus::Complete;
        if bracketed {
            builder.put_byte(b'[')?;
        }
        for (i, item) in array.iter().enumerate() {
            if i > 0 {
                builder.put_str(&opts.delim)?;
            }
            status = status.merge(render_value(builder, item, opts, guard)?);
        }
        if bracketed {
            builder.put_byte(b']')?;
        }
        Ok(status)
    });
    match visited {
        Ok(result) => result,
        Err(err) if err.kind == DatumErrorKind::RecursionDetected => put_placeholder(builder),
        Err(err) => Err(err),
    }
}

pub(crate) fn put_placeholder(builder: &mut Builder<'_>) -> DatumResult<RenderStatus> {
    builder.put_str(RECURSION_PLACEHOLDER)?;
    Ok(RenderStatus::RecursionDetected)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
