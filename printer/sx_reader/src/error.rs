//! Reader errors.
//!
//! Every error carries the byte offset it was detected at so callers can
//! point back into the source text.

use std::fmt;

/// What went wrong while reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadErrorKind {
    /// The lexer could not match any token.
    Lex,
    /// Input ended inside a form.
    UnexpectedEof,
    /// A `)` with no matching `(`.
    UnexpectedCloseParen,
    /// A `(` was never closed.
    UnclosedParen,
    /// A `.` outside the tail position of a list.
    StrayDot,
    /// More than one form after the `.` in a dotted list.
    ExpectedCloseAfterTail,
    /// A numeric token that does not fit the value type.
    InvalidNumber,
    /// An unknown `#\…` character name.
    InvalidChar,
}

impl fmt::Display for ReadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ReadErrorKind::Lex => "unrecognized token",
            ReadErrorKind::UnexpectedEof => "unexpected end of input",
            ReadErrorKind::UnexpectedCloseParen => "unmatched `)`",
            ReadErrorKind::UnclosedParen => "unclosed `(`",
            ReadErrorKind::StrayDot => "`.` outside dotted-tail position",
            ReadErrorKind::ExpectedCloseAfterTail => "expected `)` after dotted tail",
            ReadErrorKind::InvalidNumber => "number out of range",
            ReadErrorKind::InvalidChar => "unknown character name",
        };
        f.write_str(msg)
    }
}

/// Reader error with source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    pub kind: ReadErrorKind,
    /// Byte offset into the source text.
    pub offset: usize,
}

impl ReadError {
    #[cold]
    pub(crate) fn new(kind: ReadErrorKind, offset: usize) -> Self {
        ReadError { kind, offset }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "read error at byte {}: {}", self.offset, self.kind)
    }
}

impl std::error::Error for ReadError {}
