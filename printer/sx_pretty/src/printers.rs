//! List printers.
//!
//! The convenience emitters (`pprint_fill`, `pprint_linear`,
//! `pprint_tabular`) and the built-in printers installed in the standard
//! dispatch table. Printers are plain data for the table: records of
//! type-spec form and callback.

use std::sync::Arc;

use sx_ir::{well_known, Value};

use crate::dispatch::{DispatchError, DispatchTable, PrinterFn};
use crate::error::PrintResult;
use crate::object::{output_object, output_ugly};
use crate::queue::{IndentKind, NewlineKind, TabKind};
use crate::stream::PrettyStream;

/// Print a list with `Fill` breaks between items: as many per line as fit.
pub fn pprint_fill(
    stream: &mut PrettyStream<'_>,
    list: &Value,
    table: &DispatchTable,
    parens: bool,
) -> PrintResult<()> {
    pprint_list(stream, list, table, parens, NewlineKind::Fill, None)
}

/// Print a list with `Linear` breaks: one line, or one item per line.
pub fn pprint_linear(
    stream: &mut PrettyStream<'_>,
    list: &Value,
    table: &DispatchTable,
    parens: bool,
) -> PrintResult<()> {
    pprint_list(stream, list, table, parens, NewlineKind::Linear, None)
}

/// Print a list in tab-aligned columns `colinc` wide.
pub fn pprint_tabular(
    stream: &mut PrettyStream<'_>,
    list: &Value,
    table: &DispatchTable,
    parens: bool,
    colinc: usize,
) -> PrintResult<()> {
    pprint_list(
        stream,
        list,
        table,
        parens,
        NewlineKind::Fill,
        Some(colinc),
    )
}

fn pprint_list(
    stream: &mut PrettyStream<'_>,
    list: &Value,
    table: &DispatchTable,
    parens: bool,
    kind: NewlineKind,
    tab_colinc: Option<usize>,
) -> PrintResult<()> {
    if list.as_cons().is_none() {
        return output_ugly(stream, list);
    }
    let (prefix, suffix) = if parens {
        (Some("("), Some(")"))
    } else {
        (None, None)
    };
    stream.logical_block(prefix, false, suffix, |s| {
        let mut iter = list.items();
        let items: Vec<&Value> = (&mut iter).collect();
        let tail = iter.tail();
        let mut first = true;
        for item in items {
            if !first {
                s.write_char(' ')?;
                if let Some(colinc) = tab_colinc {
                    s.tab(TabKind::SectionRelative, 0, colinc);
                }
                s.newline(kind)?;
            }
            output_object(s, item, table)?;
            first = false;
        }
        if !tail.is_nil() {
            if !first {
                s.write_char(' ')?;
                s.newline(kind)?;
            }
            s.write_str(". ")?;
            output_object(s, tail, table)?;
        }
        Ok(())
    })
}

/// `(head arg …)` with continuation lines aligned under the first argument.
fn print_call_form(
    stream: &mut PrettyStream<'_>,
    value: &Value,
    table: &DispatchTable,
) -> PrintResult<()> {
    stream.logical_block(Some("("), false, Some(")"), |s| {
        let mut iter = value.items();
        let items: Vec<&Value> = (&mut iter).collect();
        let tail = iter.tail();
        let Some((head, args)) = items.split_first() else {
            return Ok(());
        };
        output_object(s, head, table)?;
        if args.is_empty() && tail.is_nil() {
            return Ok(());
        }
        s.write_char(' ')?;
        s.indent(IndentKind::Current, 0);
        let mut first = true;
        for arg in args {
            if !first {
                s.write_char(' ')?;
                s.newline(NewlineKind::Fill)?;
            }
            output_object(s, arg, table)?;
            first = false;
        }
        if !tail.is_nil() {
            if !first {
                s.write_char(' ')?;
                s.newline(NewlineKind::Fill)?;
            }
            s.write_str(". ")?;
            output_object(s, tail, table)?;
        }
        Ok(())
    })
}

/// Pairs with no symbol head, dotted tails included.
fn print_other_cons(
    stream: &mut PrettyStream<'_>,
    value: &Value,
    table: &DispatchTable,
) -> PrintResult<()> {
    pprint_fill(stream, value, table, true)
}

fn space_before_sugar(next: char) -> Option<char> {
    // `,@` and `,.` would read as splicing forms.
    (next == '@' || next == '.').then_some(' ')
}

/// Quote-family forms print as their reader sugar.
fn print_quote_form(
    stream: &mut PrettyStream<'_>,
    value: &Value,
    table: &DispatchTable,
) -> PrintResult<()> {
    let Some((sigil, inner)) = value.quote_sugar() else {
        // Wrong shape, e.g. `(quote a b)`: print it as an ordinary call.
        return print_call_form(stream, value, table);
    };
    stream.write_str(sigil)?;
    if sigil == "," {
        stream.set_char_out_hook(space_before_sugar);
    }
    output_object(stream, inner, table)
}

fn printer(
    f: fn(&mut PrettyStream<'_>, &Value, &DispatchTable) -> PrintResult<()>,
) -> PrinterFn {
    Arc::new(f)
}

/// Seed `table` with the built-in printers.
pub(crate) fn install_builtin_printers(table: &mut DispatchTable) -> Result<(), DispatchError> {
    let wk = well_known();

    // Call forms: any pair with a symbol head.
    let call_spec = Value::list([Value::sym("cons"), Value::sym("symbol")]);
    table.set_initial(&call_spec, printer(print_call_form), 0)?;

    // Quote family, via the head-symbol fast path.
    let quote_spec = Value::list([
        Value::sym("cons"),
        Value::list([
            Value::sym("member"),
            Value::Sym(wk.quote),
            Value::Sym(wk.quasiquote),
            Value::Sym(wk.unquote),
            Value::Sym(wk.unquote_splicing),
        ]),
    ]);
    table.set_initial(&quote_spec, printer(print_quote_form), 1)?;

    // Everything else that is a pair.
    let cons_spec = Value::sym("cons");
    table.set_initial(&cons_spec, printer(print_other_cons), -5)?;

    Ok(())
}
