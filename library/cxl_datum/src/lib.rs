//! CXL Datum - universal values, value arrays and a byte builder.
//!
//! Three types make up the core:
//! - [`Value`]: a tagged union holding nil, a boolean, an integer, a real, a
//!   string, a byte blob or an array. Short strings live inline.
//! - [`Array`]: a resizable sequence of values with negative indexing,
//!   slicing, set operations, splitting and rendering.
//! - [`Builder`]: a chunked byte accumulator that writes forward or backward
//!   and finalizes into a destination `Value`.
//!
//! Arrays may contain themselves through reference values. Every recursive
//! traversal (copy, equality, render) detects this and either fails with
//! `RecursionDetected` or, for rendering, emits a placeholder and reports
//! [`RenderStatus::RecursionDetected`].
//!
//! # Tracing
//!
//! Growth, chunk commits and cycle detection emit `tracing` events. Call
//! [`init_tracing`] and set `RUST_LOG=cxl_datum=trace` to see them.

mod array;
mod builder;
mod cycle;
mod errors;
pub mod limits;
mod stack;
mod tracked;
mod value;

use std::sync::Once;

pub use array::{
    Array, ArrayHandle, ArrayRef, Delimiter, Iter, IterMut, MatchMode, RenderFlags, RenderOptions,
    RenderStatus, Rendered, RECURSION_PLACEHOLDER,
};
pub use builder::{Builder, CloseKind, ConvFlags, FabMode};
pub use cxl_text::VizFlags;
pub use errors::{DatumError, DatumErrorKind, DatumResult};
pub use stack::ensure_sufficient_stack;
pub use tracked::{Checkpoint, TrackedId, TrackedScope, TrackedStack};
pub use value::{BlobView, Heap, HeapRef, MiniStr, Released, StrView, Value, ValueKind};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
