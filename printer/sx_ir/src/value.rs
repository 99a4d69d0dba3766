//! S-expression values.
//!
//! `Value` is the datum the reader produces and the printers consume. Heap
//! variants (`Str`, `Cons`) are `Arc`-backed so values clone cheaply and can
//! be shared with printer callbacks.
//!
//! `Display` renders the single-line "ugly" form: standard list notation
//! with dotted pairs, quote-family sugar, and `|…|` escaping for symbols
//! that would not read back.

use crate::interner::{intern, well_known, Name};
use std::fmt;
use std::sync::Arc;

/// One cons cell.
#[derive(Clone, Debug, PartialEq)]
pub struct ConsCell {
    pub car: Value,
    pub cdr: Value,
}

/// An s-expression datum.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The empty list.
    Nil,
    /// Interned symbol.
    Sym(Name),
    /// Integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Character.
    Char(char),
    /// String.
    Str(Arc<str>),
    /// Pair.
    Cons(Arc<ConsCell>),
}

impl Value {
    /// Intern `name` and wrap it as a symbol.
    pub fn sym(name: &str) -> Value {
        Value::Sym(intern(name))
    }

    /// Allocate a string value.
    pub fn string(s: &str) -> Value {
        Value::Str(Arc::from(s))
    }

    /// Allocate a cons cell.
    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Cons(Arc::new(ConsCell { car, cdr }))
    }

    /// Build a proper list from the items.
    pub fn list<I>(items: I) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        let items: Vec<Value> = items.into_iter().collect();
        let mut out = Value::Nil;
        for item in items.into_iter().rev() {
            out = Value::cons(item, out);
        }
        out
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    #[inline]
    pub fn as_cons(&self) -> Option<&ConsCell> {
        match self {
            Value::Cons(cell) => Some(cell),
            _ => None,
        }
    }

    /// The head symbol of a pair, if the car is a symbol.
    pub fn head_symbol(&self) -> Option<Name> {
        match &self.as_cons()?.car {
            Value::Sym(name) => Some(*name),
            _ => None,
        }
    }

    /// Iterate the list spine; see [`ListItems::tail`] for improper lists.
    pub fn items(&self) -> ListItems<'_> {
        ListItems { rest: self }
    }

    /// Identity-flavored equality: scalars by value, heap values by pointer.
    ///
    /// This is the comparison `(eql V)` and `(member …)` type specifiers
    /// use; `==` on `Value` is structural.
    pub fn eql(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Sym(a), Value::Sym(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::Cons(a), Value::Cons(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// If this is `(quote x)`, `(quasiquote x)`, `(unquote x)` or
    /// `(unquote-splicing x)`, return the sugar sigil and `x`.
    pub fn quote_sugar(&self) -> Option<(&'static str, &Value)> {
        let cell = self.as_cons()?;
        let head = match cell.car {
            Value::Sym(name) => name,
            _ => return None,
        };
        let arg = cell.cdr.as_cons()?;
        if !arg.cdr.is_nil() {
            return None;
        }
        let wk = well_known();
        let sigil = if head == wk.quote {
            "'"
        } else if head == wk.quasiquote {
            "`"
        } else if head == wk.unquote {
            ","
        } else if head == wk.unquote_splicing {
            ",@"
        } else {
            return None;
        };
        Some((sigil, &arg.car))
    }
}

/// Iterator over the cars of a list spine.
pub struct ListItems<'a> {
    rest: &'a Value,
}

impl<'a> ListItems<'a> {
    /// Whatever follows the last proper pair: `Nil` for a proper list, the
    /// dotted tail otherwise.
    pub fn tail(&self) -> &'a Value {
        self.rest
    }
}

impl<'a> Iterator for ListItems<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        match self.rest {
            Value::Cons(cell) => {
                self.rest = &cell.cdr;
                Some(&cell.car)
            }
            _ => None,
        }
    }
}

/// Whether a symbol needs `|…|` escaping to read back as itself.
fn symbol_needs_escape(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s.chars()
        .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '\'' | '`' | ',' | ';' | '"' | '|' | '#' | '\\'))
    {
        return true;
    }
    // A symbol that would lex as a number must be escaped.
    s.parse::<i64>().is_ok() || s.parse::<f64>().is_ok()
}

fn write_symbol(f: &mut fmt::Formatter<'_>, name: Name) -> fmt::Result {
    let s = name.as_str();
    if symbol_needs_escape(s) {
        write!(f, "|{s}|")
    } else {
        f.write_str(s)
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

fn write_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        ' ' => f.write_str("#\\space"),
        '\n' => f.write_str("#\\newline"),
        '\t' => f.write_str("#\\tab"),
        '\r' => f.write_str("#\\return"),
        _ => write!(f, "#\\{c}"),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("()"),
            Value::Sym(name) => write_symbol(f, *name),
            Value::Int(i) => write!(f, "{i}"),
            // Debug formatting keeps the decimal point so floats read back
            // as floats.
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Char(c) => write_char(f, *c),
            Value::Str(s) => write_string(f, s),
            Value::Cons(_) => {
                if let Some((sigil, inner)) = self.quote_sugar() {
                    f.write_str(sigil)?;
                    return write!(f, "{inner}");
                }
                f.write_str("(")?;
                let mut items = self.items();
                let mut first = true;
                for item in &mut items {
                    if !first {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                    first = false;
                }
                let tail = items.tail();
                if !tail.is_nil() {
                    write!(f, " . {tail}")?;
                }
                f.write_str(")")
            }
        }
    }
}
