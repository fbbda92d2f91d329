//! Chunked byte builder.
//!
//! A [`Builder`] accumulates bytes for a destination [`Value`] and installs
//! the result when closed. Bytes go into a live work buffer (the window);
//! a window that reaches [`CHUNK_SIZE_MAX`] is committed to a stack of
//! immutable chunks and replaced. Closing concatenates chunks and window.
//!
//! # Direction
//!
//! In [`FabMode::Prepend`] each put lands in front of everything written
//! before it. The window then stores its bytes in reverse so that a put is
//! still a push; committed chunks are stored in reading order.
//!
//! # Lifecycle
//!
//! `open` borrows the destination for the builder's whole life and `close`
//! consumes the builder, so a builder cannot be used after it is closed.
//! Dropping a builder without closing it leaves the destination nil.

mod convert;

use std::fmt;
use std::mem;

use smallvec::SmallVec;
use tracing::{debug, trace};

pub use convert::ConvFlags;

use crate::array::render::{put_placeholder, render_array, render_value};
use crate::array::{Array, RenderFlags, RenderOptions, RenderStatus};
use crate::cycle::CycleGuard;
use crate::errors::{binary_as_text, invalid_utf8, nothing_to_unput, out_of_memory, DatumResult};
use crate::limits::{CHUNK_SIZE_0, CHUNK_SIZE_4, CHUNK_SIZE_MAX};
use crate::value::{Heap, Value};

/// Where new bytes go relative to existing content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FabMode {
    /// Discard the destination's content.
    Clear,
    /// Write after the destination's string content.
    Append,
    /// Write before the destination's string content.
    Prepend,
}

/// Kind of value [`Builder::close`] installs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseKind {
    /// A string when the bytes are valid text, otherwise a blob.
    Auto,
    /// A string; binary data is an `EncodingError`.
    Text,
    /// A blob.
    Blob,
}

/// Piecewise writer for a destination [`Value`].
pub struct Builder<'v> {
    dest: &'v mut Value,
    mode: FabMode,
    /// Committed chunks, oldest first, each in reading order.
    chunks: SmallVec<[Vec<u8>; 4]>,
    /// Live work buffer; reversed in prepend mode.
    window: Vec<u8>,
    /// Logical window size on the growth curve.
    window_cap: usize,
    /// Bytes put since opening, less bytes unput.
    put_count: usize,
}

impl<'v> Builder<'v> {
    /// Open a builder on `dest`.
    ///
    /// With `Append` or `Prepend`, existing string content of `dest` is
    /// kept and new bytes are written after or before it. Any other
    /// destination kind is cleared, as with `Clear`.
    pub fn open(dest: &'v mut Value, mode: FabMode) -> DatumResult<Self> {
        let existing = if mode != FabMode::Clear && dest.is_str() {
            Some(dest.transfer())
        } else {
            dest.clear();
            None
        };
        let mode = if existing.is_none() && mode == FabMode::Append {
            FabMode::Clear
        } else {
            mode
        };

        let mut builder = Builder {
            dest,
            mode,
            chunks: SmallVec::new(),
            window: Vec::new(),
            window_cap: 0,
            put_count: 0,
        };
        if let Some(old) = existing {
            builder.preload(old.str_view()?.as_bytes())?;
        }
        Ok(builder)
    }

    /// Load existing content: small content into the window, large content
    /// as a pre-chunk.
    fn preload(&mut self, bytes: &[u8]) -> DatumResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        if bytes.len() < CHUNK_SIZE_MAX {
            self.grow(bytes.len())?;
            if self.mode == FabMode::Prepend {
                self.window.extend(bytes.iter().rev());
            } else {
                self.window.extend_from_slice(bytes);
            }
        } else {
            let mut chunk = Vec::new();
            chunk
                .try_reserve_exact(bytes.len())
                .map_err(|_| out_of_memory("builder chunk"))?;
            chunk.extend_from_slice(bytes);
            self.chunks.push(chunk);
        }
        Ok(())
    }

    /// Enlarge the window, committing it first if it is already at the
    /// maximum size. `min_size` only sizes the first allocation.
    fn grow(&mut self, min_size: usize) -> DatumResult<()> {
        let cap = self.window_cap;
        let new_cap = if cap == 0 {
            if min_size < CHUNK_SIZE_0 {
                CHUNK_SIZE_0
            } else if min_size < CHUNK_SIZE_4 {
                CHUNK_SIZE_4
            } else {
                CHUNK_SIZE_MAX
            }
        } else if cap < CHUNK_SIZE_4 {
            cap * 2
        } else if cap < CHUNK_SIZE_MAX {
            cap * 4
        } else {
            self.commit();
            CHUNK_SIZE_MAX
        };
        self.window
            .try_reserve_exact(new_cap - self.window.len())
            .map_err(|_| out_of_memory("builder buffer"))?;
        self.window_cap = new_cap;
        Ok(())
    }

    /// Move the full window onto the chunk stack.
    fn commit(&mut self) {
        let mut chunk = mem::take(&mut self.window);
        if self.mode == FabMode::Prepend {
            chunk.reverse();
        }
        trace!(len = chunk.len(), chunks = self.chunks.len() + 1, "builder chunk committed");
        self.chunks.push(chunk);
    }

    pub fn mode(&self) -> FabMode {
        self.mode
    }

    /// Total bytes held, including content kept from the destination.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum::<usize>() + self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty() && self.chunks.iter().all(Vec::is_empty)
    }

    pub fn put_byte(&mut self, b: u8) -> DatumResult<()> {
        if self.window.len() == self.window_cap {
            self.grow(0)?;
        }
        self.window.push(b);
        self.put_count += 1;
        Ok(())
    }

    /// Put raw bytes, which may include NUL.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> DatumResult<()> {
        let mut rest = bytes;
        while !rest.is_empty() {
            if self.window.len() == self.window_cap {
                self.grow(0)?;
            }
            let n = rest.len().min(self.window_cap - self.window.len());
            if self.mode == FabMode::Prepend {
                let (head, tail) = rest.split_at(rest.len() - n);
                self.window.extend(tail.iter().rev());
                rest = head;
            } else {
                let (head, tail) = rest.split_at(n);
                self.window.extend_from_slice(head);
                rest = tail;
            }
        }
        self.put_count += bytes.len();
        Ok(())
    }

    pub fn put_str(&mut self, s: &str) -> DatumResult<()> {
        self.put_bytes(s.as_bytes())
    }

    pub fn put_char(&mut self, c: char) -> DatumResult<()> {
        let mut utf8 = [0; 4];
        self.put_str(c.encode_utf8(&mut utf8))
    }

    /// Put formatted text.
    pub fn put_fmt(&mut self, args: fmt::Arguments<'_>) -> DatumResult<()> {
        match args.as_str() {
            Some(s) => self.put_str(s),
            None => self.put_str(&args.to_string()),
        }
    }

    /// Render `value` and put the text.
    ///
    /// An array value is bracketed only with [`RenderFlags::BRACKETS`].
    pub fn put_value(&mut self, value: &Value, opts: &RenderOptions) -> DatumResult<RenderStatus> {
        if self.mode == FabMode::Prepend {
            return self.put_rendered(|builder| builder.put_value(value, opts));
        }
        let mut guard = CycleGuard::new();
        if value.is_array() {
            let handle = value.array_handle()?;
            let status = match handle.try_borrow() {
                Ok(array) => render_array(self, &array, opts, &mut guard, opts.flags.contains(RenderFlags::BRACKETS)),
                Err(_) => put_placeholder(self),
            };
            status
        } else {
            render_value(self, value, opts, &mut guard)
        }
    }

    /// Render `array` and put the text.
    pub fn put_array(&mut self, array: &Array, opts: &RenderOptions) -> DatumResult<RenderStatus> {
        if self.mode == FabMode::Prepend {
            return self.put_rendered(|builder| builder.put_array(array, opts));
        }
        let bracketed = opts.flags.contains(RenderFlags::BRACKETS);
        render_array(self, array, opts, &mut CycleGuard::new(), bracketed)
    }

    /// Render forward into a scratch value, then put the result as a unit
    /// so that prepending keeps the rendered text in reading order.
    fn put_rendered(
        &mut self,
        render: impl FnOnce(&mut Builder<'_>) -> DatumResult<RenderStatus>,
    ) -> DatumResult<RenderStatus> {
        let mut scratch = Value::Nil;
        let mut builder = Builder::open(&mut scratch, FabMode::Clear)?;
        let status = render(&mut builder)?;
        let (_, bytes) = builder.finish()?;
        self.put_bytes(&bytes)?;
        Ok(status)
    }

    /// Remove the most recently put byte.
    ///
    /// Fails with `Empty` if every byte put since opening has been removed.
    /// Content kept from the destination is never removed.
    pub fn unput(&mut self) -> DatumResult<()> {
        if self.put_count == 0 {
            return Err(nothing_to_unput());
        }
        if self.window.is_empty() {
            // Put bytes remain, so the last chunk holds some of them.
            let Some(mut chunk) = self.chunks.pop() else {
                return Err(nothing_to_unput());
            };
            if self.mode == FabMode::Prepend {
                chunk.reverse();
            }
            self.window_cap = chunk.len().max(CHUNK_SIZE_MAX);
            self.window = chunk;
        }
        self.window.pop();
        self.put_count -= 1;
        Ok(())
    }

    /// Concatenate chunks and window in reading order, handing back the
    /// destination.
    fn finish(self) -> DatumResult<(&'v mut Value, Vec<u8>)> {
        let len = self.len();
        let Builder { dest, mode, chunks, mut window, .. } = self;
        if chunks.is_empty() {
            if mode == FabMode::Prepend {
                window.reverse();
            }
            return Ok((dest, window));
        }
        let mut out = Vec::new();
        out.try_reserve_exact(len)
            .map_err(|_| out_of_memory("builder result"))?;
        if mode == FabMode::Prepend {
            out.extend(window.iter().rev());
            for chunk in chunks.iter().rev() {
                out.extend_from_slice(chunk);
            }
        } else {
            for chunk in &chunks {
                out.extend_from_slice(chunk);
            }
            out.extend_from_slice(&window);
        }
        Ok((dest, out))
    }

    /// Finish and install the result in the destination.
    ///
    /// Data holding a NUL byte is binary. With [`CloseKind::Text`], binary
    /// or non-UTF-8 data fails with `EncodingError` and the destination is
    /// left nil. Nothing written gives the null string, or an empty blob
    /// with [`CloseKind::Blob`].
    pub fn close(self, kind: CloseKind) -> DatumResult<()> {
        let chunks = self.chunks.len();
        let (dest, bytes) = self.finish()?;
        let binary = bytes.contains(&0);
        debug!(len = bytes.len(), chunks, binary, ?kind, "builder closed");

        *dest = match kind {
            CloseKind::Blob => Value::Blob(Heap::from(bytes)),
            _ if bytes.is_empty() => Value::null(),
            CloseKind::Text => {
                if binary {
                    return Err(binary_as_text());
                }
                let text = String::from_utf8(bytes).map_err(|_| invalid_utf8())?;
                Value::text_owned(text)
            }
            CloseKind::Auto => {
                if binary {
                    Value::Blob(Heap::from(bytes))
                } else {
                    match String::from_utf8(bytes) {
                        Ok(text) => Value::text_owned(text),
                        Err(err) => Value::Blob(Heap::from(err.into_bytes())),
                    }
                }
            }
        };
        Ok(())
    }
}

impl fmt::Write for Builder<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_str(s).map_err(|_| fmt::Error)
    }
}

impl fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("mode", &self.mode)
            .field("chunks", &self.chunks.len())
            .field("window", &self.window.len())
            .field("window_cap", &self.window_cap)
            .field("put_count", &self.put_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
