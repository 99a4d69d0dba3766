#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::config::PrintConfig;
use crate::object::output_pretty;
use pretty_assertions::assert_eq;
use sx_ir::Value;

fn render(value: &Value, table: &DispatchTable) -> String {
    let mut out = String::new();
    output_pretty(&mut out, value, &PrintConfig::default(), table).unwrap();
    out
}

fn marker(label: &'static str) -> PrinterFn {
    Arc::new(move |stream: &mut PrettyStream<'_>, _: &Value, _: &DispatchTable| {
        stream.write_str(label)
    })
}

fn cons_eql_spec(head: &str) -> Value {
    Value::list([
        Value::sym("cons"),
        Value::list([Value::sym("eql"), Value::sym(head)]),
    ])
}

fn call(head: &str, args: &[i64]) -> Value {
    let mut items = vec![Value::sym(head)];
    items.extend(args.iter().map(|&n| Value::Int(n)));
    Value::list(items)
}

#[test]
fn atoms_fall_through_to_ugly() {
    let table = standard_table();
    assert_eq!(render(&Value::Int(42), table), "42");
    assert_eq!(render(&Value::sym("x"), table), "x");
    assert_eq!(render(&Value::string("s"), table), "\"s\"");
}

#[test]
fn user_cons_entry_beats_initial_symbol_entry() {
    let mut table = copy_pprint_dispatch(None);
    table
        .set(&cons_eql_spec("foo"), Some(marker("<foo>")), 0)
        .unwrap();
    assert_eq!(render(&call("foo", &[1, 2]), &table), "<foo>");
    // Other heads still take the initial call-form printer.
    assert_eq!(render(&call("bar", &[1, 2]), &table), "(bar 1 2)");
}

#[test]
fn user_entries_outrank_initial_entries_regardless_of_priority() {
    let mut table = copy_pprint_dispatch(None);
    table
        .set(&Value::sym("cons"), Some(marker("<any-pair>")), -100)
        .unwrap();
    assert_eq!(render(&call("bar", &[1]), &table), "<any-pair>");
}

#[test]
fn higher_priority_list_entry_beats_cons_entry() {
    let mut table = copy_pprint_dispatch(None);
    table
        .set(&cons_eql_spec("foo"), Some(marker("<cons-foo>")), 0)
        .unwrap();
    table
        .set(&Value::sym("cons"), Some(marker("<pair>")), 1)
        .unwrap();
    assert_eq!(render(&call("foo", &[]), &table), "<pair>");
}

#[test]
fn equal_priority_list_entry_loses_to_cons_entry() {
    let mut table = copy_pprint_dispatch(None);
    table
        .set(&cons_eql_spec("foo"), Some(marker("<cons-foo>")), 0)
        .unwrap();
    table
        .set(&Value::sym("cons"), Some(marker("<pair>")), 0)
        .unwrap();
    assert_eq!(render(&call("foo", &[]), &table), "<cons-foo>");
}

#[test]
fn equal_priority_keeps_first_installed_entry_first() {
    let mut table = DispatchTable::new();
    table
        .set(&Value::sym("symbol"), Some(marker("<first>")), 0)
        .unwrap();
    table
        .set(
            &Value::list([Value::sym("member"), Value::sym("x")]),
            Some(marker("<second>")),
            0,
        )
        .unwrap();
    // Both accept `x`; the earlier install stays in front on ties.
    assert_eq!(render(&Value::sym("x"), &table), "<first>");
}

#[test]
fn strictly_higher_priority_wins() {
    let mut table = DispatchTable::new();
    table
        .set(&Value::sym("symbol"), Some(marker("<sym>")), 0)
        .unwrap();
    table
        .set(
            &Value::list([Value::sym("eql"), Value::sym("x")]),
            Some(marker("<x>")),
            1,
        )
        .unwrap();
    assert_eq!(render(&Value::sym("x"), &table), "<x>");
    assert_eq!(render(&Value::sym("y"), &table), "<sym>");
}

#[test]
fn reinstalling_the_same_spec_replaces_the_entry() {
    let mut table = DispatchTable::new();
    table
        .set(&Value::sym("symbol"), Some(marker("<old>")), 0)
        .unwrap();
    table
        .set(&Value::sym("symbol"), Some(marker("<new>")), 0)
        .unwrap();
    assert_eq!(render(&Value::sym("x"), &table), "<new>");
}

#[test]
fn installing_none_removes_entries() {
    let mut table = copy_pprint_dispatch(None);
    table
        .set(&cons_eql_spec("foo"), Some(marker("<foo>")), 0)
        .unwrap();
    table.set(&cons_eql_spec("foo"), None, 0).unwrap();
    assert_eq!(render(&call("foo", &[7]), &table), "(foo 7)");

    table
        .set(&Value::sym("symbol"), Some(marker("<sym>")), 0)
        .unwrap();
    table.set(&Value::sym("symbol"), None, 0).unwrap();
    assert_eq!(render(&Value::sym("x"), &table), "x");
}

#[test]
fn member_union_installs_every_head() {
    let mut table = copy_pprint_dispatch(None);
    let spec = Value::list([
        Value::sym("cons"),
        Value::list([Value::sym("member"), Value::sym("let"), Value::sym("let*")]),
    ]);
    table.set(&spec, Some(marker("<binder>")), 0).unwrap();
    assert_eq!(render(&call("let", &[]), &table), "<binder>");
    assert_eq!(render(&call("let*", &[]), &table), "<binder>");
    assert_eq!(render(&call("if", &[]), &table), "(if)");
}

#[test]
fn or_of_cons_eql_takes_the_fast_path() {
    let mut table = copy_pprint_dispatch(None);
    let spec = Value::list([
        Value::sym("or"),
        cons_eql_spec("when"),
        cons_eql_spec("unless"),
    ]);
    table.set(&spec, Some(marker("<cond>")), 0).unwrap();
    assert_eq!(render(&call("when", &[1]), &table), "<cond>");
    assert_eq!(render(&call("unless", &[1]), &table), "<cond>");
}

#[test]
fn standard_table_is_frozen() {
    let mut table = standard_table().clone();
    let err = table
        .set(&Value::sym("symbol"), Some(marker("<nope>")), 0)
        .unwrap_err();
    assert_eq!(err, DispatchError::StandardTableFrozen);
}

#[test]
fn invalid_spec_is_rejected_and_state_unchanged() {
    let mut table = copy_pprint_dispatch(None);
    let err = table
        .set(&Value::Int(3), Some(marker("<nope>")), 0)
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidTypeSpec(_)));
    let err = table
        .set(
            &Value::list([Value::sym("no-such-combinator"), Value::sym("t")]),
            Some(marker("<nope>")),
            0,
        )
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidTypeSpec(_)));
    assert_eq!(render(&call("bar", &[1]), &table), "(bar 1)");
}

fn keyword_symbol_p(value: &Value) -> bool {
    match value {
        Value::Sym(name) => name.as_str().starts_with(':'),
        _ => false,
    }
}

#[test]
fn unknown_predicate_defers_until_registered() {
    let mut table = copy_pprint_dispatch(None);
    let spec = Value::list([Value::sym("satisfies"), Value::sym("keyword-symbol-p")]);
    table.set(&spec, Some(marker("<kw>")), 5).unwrap();

    // Before registration the entry matches nothing.
    assert_eq!(render(&Value::sym(":kw"), &table), ":kw");

    register_type_predicate("keyword-symbol-p", keyword_symbol_p);

    assert_eq!(render(&Value::sym(":kw"), &table), "<kw>");
    assert_eq!(render(&Value::sym("plain"), &table), "plain");
}

#[test]
fn known_predicate_compiles_eagerly() {
    register_type_predicate("integer-value-p", |value| matches!(value, Value::Int(_)));
    let mut table = copy_pprint_dispatch(None);
    let spec = Value::list([Value::sym("satisfies"), Value::sym("integer-value-p")]);
    table.set(&spec, Some(marker("<int>")), 0).unwrap();
    assert_eq!(render(&Value::Int(9), &table), "<int>");
}

#[test]
fn compound_specs_match_structurally() {
    let mut table = DispatchTable::new();
    let spec = Value::list([
        Value::sym("and"),
        Value::sym("cons"),
        Value::list([
            Value::sym("not"),
            Value::list([Value::sym("cons"), Value::sym("symbol")]),
        ]),
    ]);
    table.set(&spec, Some(marker("<odd-pair>")), 0).unwrap();
    let pair = Value::cons(Value::Int(1), Value::Int(2));
    assert_eq!(render(&pair, &table), "<odd-pair>");
    assert_eq!(render(&call("f", &[1]), &table), "(f 1)");
}

#[test]
fn cons_spec_with_cdr_constraint_uses_the_slow_path() {
    let mut table = copy_pprint_dispatch(None);
    // A constrained cdr disqualifies the head fast path but still matches.
    let spec = Value::list([
        Value::sym("cons"),
        Value::list([Value::sym("eql"), Value::sym("pair")]),
        Value::sym("null"),
    ]);
    table.set(&spec, Some(marker("<unary>")), 2).unwrap();
    let unary = Value::list([Value::sym("pair")]);
    let binary = Value::list([Value::sym("pair"), Value::Int(1)]);
    assert_eq!(render(&unary, &table), "<unary>");
    assert_eq!(render(&binary, &table), "(pair 1)");
}

#[test]
fn copy_of_standard_table_is_independent() {
    let mut copy = copy_pprint_dispatch(None);
    copy.set(&cons_eql_spec("foo"), Some(marker("<foo>")), 0)
        .unwrap();
    assert_eq!(render(&call("foo", &[]), standard_table()), "(foo)");
    assert_eq!(render(&call("foo", &[]), &copy), "<foo>");
}
