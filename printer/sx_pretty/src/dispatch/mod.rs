//! Printer dispatch tables.
//!
//! A table maps a value to the printer that should render it: an ordered
//! list of `{type-spec, priority, printer}` entries plus a fast path keyed
//! on the head symbol of a pair. User entries outrank the built-in
//! (initial) ones regardless of priority; within each group higher priority
//! wins, and insertion is stable so an equal-priority newcomer lands behind
//! the incumbents.

mod typespec;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use sx_ir::{Name, Value};

use crate::error::PrintResult;
use crate::stream::PrettyStream;

pub use typespec::{predicate_registry, register_type_predicate, PredicateRegistry, TypePredicate};

use typespec::{cons_heads, parse_type_spec, TypeSpec, TypeSpecError};

/// A printer callback: renders `value` onto the stream, recursing through
/// the same table.
pub type PrinterFn =
    Arc<dyn Fn(&mut PrettyStream<'_>, &Value, &DispatchTable) -> PrintResult<()> + Send + Sync>;

/// Errors from table mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The type-specifier form is not parseable. The table is unchanged.
    InvalidTypeSpec(String),
    /// The standard table is frozen; copy it first.
    StandardTableFrozen,
}

impl DispatchError {
    #[cold]
    fn invalid_type_spec(message: String) -> Self {
        DispatchError::InvalidTypeSpec(message)
    }

    #[cold]
    fn standard_table_frozen() -> Self {
        DispatchError::StandardTableFrozen
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::InvalidTypeSpec(message) => f.write_str(message),
            DispatchError::StandardTableFrozen => {
                f.write_str("the standard pprint dispatch table is read-only")
            }
        }
    }
}

impl std::error::Error for DispatchError {}

/// Compiled (or deferred) membership test of one entry.
#[derive(Clone)]
enum EntryTest {
    Ready(TypeSpec),
    /// `(satisfies NAME)` named an unregistered predicate at install time.
    /// The form is re-parsed whenever the predicate registry's generation
    /// moves; until that succeeds the entry matches nothing.
    Deferred {
        form: Value,
        cell: Arc<Mutex<DeferredCell>>,
    },
}

struct DeferredCell {
    generation: u64,
    compiled: Option<TypeSpec>,
}

impl EntryTest {
    fn matches(&self, value: &Value) -> bool {
        match self {
            EntryTest::Ready(spec) => spec.matches(value),
            EntryTest::Deferred { form, cell } => {
                let mut cell = cell.lock();
                if cell.compiled.is_none() {
                    let generation = predicate_registry().generation();
                    if generation != cell.generation {
                        cell.generation = generation;
                        if let Ok(spec) = parse_type_spec(form) {
                            cell.compiled = Some(spec);
                        }
                    }
                }
                cell.compiled.as_ref().is_some_and(|spec| spec.matches(value))
            }
        }
    }
}

/// One dispatch entry.
#[derive(Clone)]
pub struct DispatchEntry {
    spec: Value,
    test: EntryTest,
    priority: i64,
    initial: bool,
    printer: PrinterFn,
}

impl DispatchEntry {
    /// Rank orders entries: user before initial, then higher priority.
    fn rank(&self) -> (bool, i64) {
        (!self.initial, self.priority)
    }

    fn accepts(&self, value: &Value) -> bool {
        self.test.matches(value)
    }

    /// Run this entry's printer.
    pub fn invoke(
        &self,
        stream: &mut PrettyStream<'_>,
        value: &Value,
        table: &DispatchTable,
    ) -> PrintResult<()> {
        (self.printer)(stream, value, table)
    }
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("spec", &self.spec.to_string())
            .field("priority", &self.priority)
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

/// Priority-ordered printer table with a head-symbol fast path.
#[derive(Clone, Default)]
pub struct DispatchTable {
    /// Sorted descending by rank.
    entries: Vec<DispatchEntry>,
    cons_entries: FxHashMap<Name, DispatchEntry>,
    read_only: bool,
}

impl DispatchTable {
    /// An empty, mutable table.
    pub fn new() -> Self {
        DispatchTable::default()
    }

    /// Find the entry that should print `value`.
    ///
    /// A cons entry for the value's head symbol wins unless some list entry
    /// of strictly higher rank also accepts the value.
    pub fn lookup(&self, value: &Value) -> Option<&DispatchEntry> {
        let cons_entry = value
            .head_symbol()
            .and_then(|name| self.cons_entries.get(&name));
        if let Some(cons_entry) = cons_entry {
            for entry in &self.entries {
                if entry.rank() <= cons_entry.rank() {
                    break;
                }
                if entry.accepts(value) {
                    return Some(entry);
                }
            }
            return Some(cons_entry);
        }
        self.entries.iter().find(|entry| entry.accepts(value))
    }

    /// Install (or with `None`, remove) a printer for a type specifier.
    pub fn set(
        &mut self,
        spec_form: &Value,
        printer: Option<PrinterFn>,
        priority: i64,
    ) -> Result<(), DispatchError> {
        self.set_with_flag(spec_form, printer, priority, false)
    }

    pub(crate) fn set_initial(
        &mut self,
        spec_form: &Value,
        printer: PrinterFn,
        priority: i64,
    ) -> Result<(), DispatchError> {
        self.set_with_flag(spec_form, Some(printer), priority, true)
    }

    fn set_with_flag(
        &mut self,
        spec_form: &Value,
        printer: Option<PrinterFn>,
        priority: i64,
        initial: bool,
    ) -> Result<(), DispatchError> {
        if self.read_only {
            return Err(DispatchError::standard_table_frozen());
        }
        let test = match parse_type_spec(spec_form) {
            Ok(spec) => EntryTest::Ready(spec),
            Err(TypeSpecError::UnknownPredicate(name)) => {
                tracing::warn!(
                    predicate = %name,
                    spec = %spec_form,
                    "type specifier references an undefined predicate; deferring"
                );
                EntryTest::Deferred {
                    form: spec_form.clone(),
                    cell: Arc::new(Mutex::new(DeferredCell {
                        generation: predicate_registry().generation(),
                        compiled: None,
                    })),
                }
            }
            Err(TypeSpecError::Invalid(message)) => {
                return Err(DispatchError::invalid_type_spec(message));
            }
        };

        // `(cons (eql S))` and unions thereof live in the fast path.
        if let EntryTest::Ready(spec) = &test {
            if let Some(heads) = cons_heads(spec) {
                for head in heads {
                    match &printer {
                        Some(printer) => {
                            self.cons_entries.insert(
                                head,
                                DispatchEntry {
                                    spec: spec_form.clone(),
                                    test: test.clone(),
                                    priority,
                                    initial,
                                    printer: printer.clone(),
                                },
                            );
                        }
                        None => {
                            self.cons_entries.remove(&head);
                        }
                    }
                }
                return Ok(());
            }
        }

        self.entries.retain(|entry| entry.spec != *spec_form);
        if let Some(printer) = printer {
            let entry = DispatchEntry {
                spec: spec_form.clone(),
                test,
                priority,
                initial,
                printer,
            };
            let position = self
                .entries
                .partition_point(|existing| existing.rank() >= entry.rank());
            self.entries.insert(position, entry);
        }
        Ok(())
    }

    pub(crate) fn freeze(&mut self) {
        self.read_only = true;
    }
}

/// The frozen standard table with the built-in printers.
pub fn standard_table() -> &'static DispatchTable {
    static INSTANCE: OnceLock<DispatchTable> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let mut table = DispatchTable::new();
        match crate::printers::install_builtin_printers(&mut table) {
            Ok(()) => {}
            Err(err) => panic!("building the standard dispatch table: {err}"),
        }
        table.freeze();
        table
    })
}

/// A mutable deep copy of `table` (the standard table when `None`).
pub fn copy_pprint_dispatch(table: Option<&DispatchTable>) -> DispatchTable {
    let mut copy = table.unwrap_or_else(|| standard_table()).clone();
    copy.read_only = false;
    copy
}

#[cfg(test)]
mod tests;
