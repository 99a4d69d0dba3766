//! sx value model
//!
//! Interned symbol names and the cons-cell `Value` type shared by the
//! reader and the pretty-printer.
//!
//! # Modules
//!
//! - [`interner`]: process-wide symbol interner
//! - [`value`]: the `Value` enum and list helpers

mod interner;
mod value;

pub use interner::{intern, interner, well_known, InternError, Interner, Name, WellKnown};
pub use value::{ConsCell, ListItems, Value};
