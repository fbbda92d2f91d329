//! Error types for value, array and builder operations.
//!
//! `DatumErrorKind` gives each failure a typed category so callers can
//! match on it. The factory functions below are the only place messages are
//! written; they fill in both `kind` and `message`.
//!
//! There is no process-wide "last error" record. The error value itself
//! carries the code and the human-readable text.

use std::fmt;

use cxl_text::TextError;

/// Result of a fallible datum operation.
pub type DatumResult<T> = Result<T, DatumError>;

/// Typed category of a datum failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatumErrorKind {
    /// An allocation could not be satisfied.
    OutOfMemory,
    /// A length, delimiter or other argument is unusable.
    InvalidArgument,
    /// A normalized array index or slice falls outside the array.
    IndexOutOfRange { index: isize, len: usize },
    /// A value was not of the kind the operation needs.
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
    /// The operation is not valid in the current state.
    InvalidOperation,
    /// An array contains itself.
    RecursionDetected,
    /// Binary data was requested as text.
    EncodingError,
    /// Nothing is left to remove.
    Empty,
    /// A reference variant outlived the value it points at.
    DanglingReference,
}

impl fmt::Display for DatumErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "array index {index} out of range (array size {len})")
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::InvalidOperation => write!(f, "invalid operation"),
            Self::RecursionDetected => write!(f, "endless recursion detected (array contains itself)"),
            Self::EncodingError => write!(f, "cannot convert binary data to string"),
            Self::Empty => write!(f, "no bytes left to \"unput\""),
            Self::DanglingReference => write!(f, "referenced value no longer exists"),
        }
    }
}

/// Error returned by datum operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DatumError {
    /// Structured category, for matching.
    pub kind: DatumErrorKind,
    /// Human-readable message.
    ///
    /// Equals `kind.to_string()` unless the factory added detail.
    pub message: String,
}

impl DatumError {
    fn from_kind(kind: DatumErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    fn with_message(kind: DatumErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// True if the failure should abort the current top-level request.
    ///
    /// Only allocation exhaustion qualifies; every other error leaves the
    /// operands in a usable state.
    pub fn is_fatal(&self) -> bool {
        self.kind == DatumErrorKind::OutOfMemory
    }
}

impl From<TextError> for DatumError {
    fn from(err: TextError) -> Self {
        Self::with_message(DatumErrorKind::InvalidArgument, err.message)
    }
}

// Factory functions

/// Allocation failure while reserving space for `what`.
#[cold]
pub(crate) fn out_of_memory(what: &str) -> DatumError {
    DatumError::with_message(DatumErrorKind::OutOfMemory, format!("out of memory, allocating {what}"))
}

#[cold]
pub(crate) fn invalid_argument(detail: impl fmt::Display) -> DatumError {
    DatumError::with_message(DatumErrorKind::InvalidArgument, detail.to_string())
}

/// A string payload containing a NUL byte.
#[cold]
pub(crate) fn embedded_nul() -> DatumError {
    invalid_argument("string contains an embedded null byte")
}

#[cold]
pub(crate) fn array_too_large() -> DatumError {
    invalid_argument(format_args!(
        "cannot grow array beyond maximum size ({})",
        crate::limits::ARRAY_SIZE_MAX
    ))
}

#[cold]
pub(crate) fn index_out_of_range(index: isize, len: usize) -> DatumError {
    DatumError::from_kind(DatumErrorKind::IndexOutOfRange { index, len })
}

/// A slice `[index, index + count)` that does not fit in an array of `len` elements.
#[cold]
pub(crate) fn slice_out_of_range(index: isize, count: isize, len: usize) -> DatumError {
    DatumError::with_message(
        DatumErrorKind::IndexOutOfRange { index, len },
        format!("array slice values [{index},{count}] out of range (array size {len})"),
    )
}

#[cold]
pub(crate) fn type_mismatch(expected: &'static str, got: &'static str) -> DatumError {
    DatumError::from_kind(DatumErrorKind::TypeMismatch { expected, got })
}

#[cold]
pub(crate) fn invalid_operation(detail: impl fmt::Display) -> DatumError {
    DatumError::with_message(DatumErrorKind::InvalidOperation, detail.to_string())
}

#[cold]
pub(crate) fn recursion_detected() -> DatumError {
    DatumError::from_kind(DatumErrorKind::RecursionDetected)
}

#[cold]
pub(crate) fn binary_as_text() -> DatumError {
    DatumError::from_kind(DatumErrorKind::EncodingError)
}

#[cold]
pub(crate) fn invalid_utf8() -> DatumError {
    DatumError::with_message(DatumErrorKind::EncodingError, "data is not valid UTF-8 text")
}

#[cold]
pub(crate) fn nothing_to_unput() -> DatumError {
    DatumError::from_kind(DatumErrorKind::Empty)
}

#[cold]
pub(crate) fn dangling_reference() -> DatumError {
    DatumError::from_kind(DatumErrorKind::DanglingReference)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
