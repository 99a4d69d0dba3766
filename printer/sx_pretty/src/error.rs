//! Printer errors.

use std::fmt;

/// Result of a printing operation.
pub type PrintResult<T> = Result<T, PrintError>;

/// Error raised by the pretty-printer engine.
#[derive(Debug)]
pub enum PrintError {
    /// Internal signal: the line budget was exhausted. Caught by
    /// [`crate::with_pretty_stream`]; never escapes the top-level driver.
    LineLimit,
    /// A partial-line flush was requested with nothing to flush.
    PartialLineOnEmptyBuffer,
    /// `end_logical_block` with no open block.
    UnmatchedBlockEnd,
    /// The underlying sink failed.
    Sink(std::io::Error),
}

impl PrintError {
    #[cold]
    pub(crate) fn line_limit() -> Self {
        PrintError::LineLimit
    }

    #[cold]
    pub(crate) fn partial_line_on_empty() -> Self {
        PrintError::PartialLineOnEmptyBuffer
    }

    #[cold]
    pub(crate) fn unmatched_block_end() -> Self {
        PrintError::UnmatchedBlockEnd
    }

    #[cold]
    pub(crate) fn sink(err: std::io::Error) -> Self {
        PrintError::Sink(err)
    }
}

impl fmt::Display for PrintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintError::LineLimit => f.write_str("line budget exhausted"),
            PrintError::PartialLineOnEmptyBuffer => {
                f.write_str("partial-line output requested on an empty buffer")
            }
            PrintError::UnmatchedBlockEnd => {
                f.write_str("end_logical_block without a matching start_logical_block")
            }
            PrintError::Sink(err) => write!(f, "sink error: {err}"),
        }
    }
}

impl std::error::Error for PrintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrintError::Sink(err) => Some(err),
            _ => None,
        }
    }
}
