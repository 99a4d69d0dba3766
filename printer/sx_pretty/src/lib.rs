//! sx pretty-printer
//!
//! A streaming layout engine for s-expression data. Callers push characters
//! and layout directives (logical blocks, conditional newlines, indentation
//! changes, tab stops) into a [`PrettyStream`]; the engine decides
//! incrementally which conditional breaks fire so the output respects the
//! configured right margin, line budget, and miser mode.
//!
//! # Architecture
//!
//! Text is buffered speculatively together with a FIFO queue of pending
//! layout operations. Each queued operation carries the monotonic stream
//! position (*posn*) at which it was enqueued; shifting the buffer only
//! adjusts one offset, never the queued references. The break-decision
//! driver drains the queue from the front, asking for each operation whether
//! enough of the future is known to commit it; when the answer is "unknown"
//! it waits for more input.
//!
//! Values are rendered through a priority-ordered [`DispatchTable`] with a
//! fast path keyed on the head symbol of a pair.
//!
//! # Modules
//!
//! - [`PrettyStream`] and the layout directive API
//! - dispatch: type-specifier driven printer selection
//! - convenience emitters: [`pprint_fill`], [`pprint_linear`], [`pprint_tabular`]

mod block;
mod buffer;
mod config;
mod dispatch;
mod error;
mod object;
mod posn;
mod printers;
mod queue;
mod sink;
mod stream;

pub use config::{PrintConfig, DEFAULT_RIGHT_MARGIN};
pub use dispatch::{
    copy_pprint_dispatch, predicate_registry, register_type_predicate, standard_table,
    DispatchEntry, DispatchError, DispatchTable, PredicateRegistry, PrinterFn, TypePredicate,
};
pub use error::{PrintError, PrintResult};
pub use object::{output_object, output_pretty, output_ugly, pretty_to_string, with_pretty_stream};
pub use printers::{pprint_fill, pprint_linear, pprint_tabular};
pub use queue::{IndentKind, NewlineKind, TabKind};
pub use sink::{IoSink, Sink};
pub use stream::{CharOutHook, PrettyStream};
