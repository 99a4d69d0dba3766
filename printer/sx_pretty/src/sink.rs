//! Output sinks.
//!
//! The engine writes finished text to a `Sink`. String sinks are infallible;
//! the [`IoSink`] adapter surfaces I/O failures as [`PrintError::Sink`].

use crate::error::{PrintError, PrintResult};
use std::io;

/// A write-only character sink.
pub trait Sink {
    /// Append `s` to the output.
    fn write_str(&mut self, s: &str) -> PrintResult<()>;
}

impl Sink for String {
    fn write_str(&mut self, s: &str) -> PrintResult<()> {
        self.push_str(s);
        Ok(())
    }
}

/// Adapter from any [`io::Write`] to a [`Sink`].
pub struct IoSink<W> {
    inner: W,
}

impl<W: io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        IoSink { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Sink for IoSink<W> {
    fn write_str(&mut self, s: &str) -> PrintResult<()> {
        self.inner.write_all(s.as_bytes()).map_err(PrintError::sink)
    }
}
