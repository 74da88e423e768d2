//! Decoder error types.

use thiserror::Error;

/// An error raised while decoding a TOON document.
///
/// Line numbers are 1-based and refer to the raw input, counting blank
/// lines. The encoder cannot fail on normalized input, so there is no
/// encode-side counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Tab in leading whitespace, or an indent that is not a multiple of
    /// the configured width (strict mode).
    #[error("invalid indentation at line {line}: {message}")]
    Indentation { line: usize, message: String },

    /// An array header that does not match the header grammar.
    #[error("invalid array header at line {line}: {message}")]
    InvalidHeader { line: usize, message: String },

    /// Element, row, or field count disagrees with the declared count
    /// (strict mode).
    #[error("count mismatch at line {line}: expected {expected}, got {actual}")]
    CountMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// Unknown escape sequence or a trailing backslash in a quoted string.
    #[error("invalid escape at line {line}: {sequence}")]
    InvalidEscape { line: usize, sequence: String },

    /// Blank line inside an array body (strict mode).
    #[error("blank line inside array at line {line}")]
    BlankInsideArray { line: usize },

    /// Dotted-key expansion hit a leaf/branch or duplicate-leaf conflict
    /// (strict mode).
    #[error("path conflict expanding key {path:?}")]
    PathConflict { path: String },

    /// A line that fits no production at its position.
    #[error("invalid line {line}: {content}")]
    InvalidLine { line: usize, content: String },
}

impl DecodeError {
    pub(crate) fn indentation(line: usize, message: impl Into<String>) -> Self {
        DecodeError::Indentation {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_header(line: usize, message: impl Into<String>) -> Self {
        DecodeError::InvalidHeader {
            line,
            message: message.into(),
        }
    }
}
