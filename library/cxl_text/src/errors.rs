//! Error type for the text helpers.

use std::fmt;

/// Result alias for fallible text helpers.
pub type TextResult<T> = Result<T, TextError>;

/// Typed category of a text helper failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextErrorKind {
    /// A backslash sequence could not be decoded.
    InvalidEscape,
    /// A delimiter spec is neither a single character nor a byte value.
    InvalidDelimiter { spec: String },
}

impl fmt::Display for TextErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEscape => write!(f, "invalid \\nn sequence"),
            Self::InvalidDelimiter { spec } => write!(
                f,
                "invalid delimiter '{spec}' (must be a character or ASCII value)"
            ),
        }
    }
}

/// Error raised by the text helpers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TextError {
    pub kind: TextErrorKind,
    pub message: String,
}

impl TextError {
    fn from_kind(kind: TextErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }
}

#[cold]
pub(crate) fn invalid_escape() -> TextError {
    TextError::from_kind(TextErrorKind::InvalidEscape)
}

#[cold]
pub(crate) fn invalid_delimiter(spec: &str) -> TextError {
    TextError::from_kind(TextErrorKind::InvalidDelimiter {
        spec: spec.to_string(),
    })
}
