//! Stream positions.
//!
//! The engine works in three coordinate systems:
//!
//! - **column** — visible offset from the start of the output line;
//! - **index** — offset into the rolling buffer;
//! - **posn** — monotonic stream position, invariant under buffer shifts.
//!
//! `posn = index + buffer_offset`. Queued operations store posns so that
//! shifting the buffer (line emission, partial flush, tab expansion) only
//! adjusts the stream's offset, never the queued references. The offset is
//! signed: tab expansion inserts characters *behind* already-assigned posns
//! and compensates by decrementing it.

/// Monotonic stream position.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub(crate) struct Posn(pub(crate) i64);
