//! Top-level value printing.
//!
//! `output_object` routes one value through a dispatch table;
//! `with_pretty_stream` scopes a stream around a printing closure, flushing
//! on the way out and absorbing the internal line-limit signal.

use sx_ir::Value;

use crate::config::PrintConfig;
use crate::dispatch::{standard_table, DispatchTable};
use crate::error::{PrintError, PrintResult};
use crate::sink::Sink;
use crate::stream::PrettyStream;

/// Print `value` through the dispatch table, falling back to the ugly
/// printer when no entry accepts it.
pub fn output_object(
    stream: &mut PrettyStream<'_>,
    value: &Value,
    table: &DispatchTable,
) -> PrintResult<()> {
    match table.lookup(value) {
        Some(entry) => entry.invoke(stream, value, table),
        None => output_ugly(stream, value),
    }
}

/// Write the single-line rendering of `value`. Embedded newlines (inside
/// strings rendered with escapes, so in practice none) would still become
/// literal breaks.
pub fn output_ugly(stream: &mut PrettyStream<'_>, value: &Value) -> PrintResult<()> {
    stream.write_str(&value.to_string())
}

/// Run `body` with a pretty stream over `target`.
///
/// On normal completion the stream is force-flushed (queue drained, tabs
/// expanded, residual buffer written). The line-limit signal is caught here
/// and turns into normal completion — the truncation marker and suffixes
/// are already on the sink, and the withheld text stays withheld. Other
/// errors propagate with the stream state unspecified.
pub fn with_pretty_stream<F>(
    target: &mut dyn Sink,
    config: &PrintConfig,
    body: F,
) -> PrintResult<()>
where
    F: FnOnce(&mut PrettyStream<'_>) -> PrintResult<()>,
{
    let mut stream = PrettyStream::new(target, config);
    match body(&mut stream) {
        Ok(()) => stream.force_output(),
        Err(PrintError::LineLimit) => Ok(()),
        Err(err) => Err(err),
    }
}

/// Pretty-print one value to `target`.
pub fn output_pretty(
    target: &mut dyn Sink,
    value: &Value,
    config: &PrintConfig,
    table: &DispatchTable,
) -> PrintResult<()> {
    with_pretty_stream(target, config, |stream| output_object(stream, value, table))
}

/// Pretty-print one value to a fresh string using the standard table.
pub fn pretty_to_string(value: &Value, config: &PrintConfig) -> PrintResult<String> {
    let mut out = String::new();
    output_pretty(&mut out, value, config, standard_table())?;
    Ok(out)
}
