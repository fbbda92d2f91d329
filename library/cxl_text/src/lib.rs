//! CXL Text - byte-level text helpers for the CXL value library.
//!
//! This crate provides the small string routines the value core consumes
//! when it renders data for humans:
//! - Visible-character rendering (`<NL>`, `^X`, `<hh>`) via [`viz_byte`]
//! - Backslash escaping and its inverse via [`escape_byte`] and [`unescape`]
//! - Shell-style single quoting via [`shell_quote`]
//! - Delimiter specs (`","`, `"9"`, `"0x2c"`) via [`parse_delimiter`]
//!
//! Everything here works on raw bytes and appends to a caller-supplied
//! `Vec<u8>`, so callers decide where the output ends up.

mod delim;
mod errors;
mod escape;
mod quote;
mod viz;

pub use delim::parse_delimiter;
pub use errors::{TextError, TextErrorKind, TextResult};
pub use escape::{escape_byte, escape_bytes, unescape, Unescaped};
pub use quote::shell_quote;
pub use viz::{viz_byte, viz_bytes, VizFlags};
