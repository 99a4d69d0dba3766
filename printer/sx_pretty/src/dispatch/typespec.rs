//! Type specifiers.
//!
//! Dispatch entries are keyed by type specifiers written as s-expression
//! forms: `symbol`, `(cons (eql foo))`, `(or string character)`,
//! `(satisfies short-list-p)`, and so on. A form is parsed once into a
//! `TypeSpec`; matching is then pure structure walking, except for
//! `satisfies` which consults the process-wide predicate registry.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use sx_ir::{intern, Name, Value};

/// A named predicate over values, usable in `(satisfies NAME)` specifiers.
pub type TypePredicate = fn(&Value) -> bool;

/// Why a type-specifier form failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TypeSpecError {
    /// Structurally not a type specifier.
    Invalid(String),
    /// Shape is fine but `(satisfies NAME)` names an unregistered
    /// predicate; the entry can be installed deferred.
    UnknownPredicate(Name),
}

/// Built-in atom types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AtomType {
    Symbol,
    Integer,
    Float,
    Number,
    Character,
    String,
    Null,
    Cons,
    List,
    Atom,
}

impl AtomType {
    fn matches(self, value: &Value) -> bool {
        match self {
            AtomType::Symbol => matches!(value, Value::Sym(_)),
            AtomType::Integer => matches!(value, Value::Int(_)),
            AtomType::Float => matches!(value, Value::Float(_)),
            AtomType::Number => matches!(value, Value::Int(_) | Value::Float(_)),
            AtomType::Character => matches!(value, Value::Char(_)),
            AtomType::String => matches!(value, Value::Str(_)),
            AtomType::Null => value.is_nil(),
            AtomType::Cons => matches!(value, Value::Cons(_)),
            AtomType::List => matches!(value, Value::Nil | Value::Cons(_)),
            AtomType::Atom => !matches!(value, Value::Cons(_)),
        }
    }
}

/// Parsed type specifier.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum TypeSpec {
    /// `t` — everything.
    Any,
    /// `nil` — nothing.
    Nothing,
    Atom(AtomType),
    /// `(cons CAR CDR)`; `None` components are unconstrained.
    Cons {
        car: Option<Box<TypeSpec>>,
        cdr: Option<Box<TypeSpec>>,
    },
    Eql(Value),
    Member(Vec<Value>),
    And(Vec<TypeSpec>),
    Or(Vec<TypeSpec>),
    Not(Box<TypeSpec>),
    Satisfies(Name),
}

impl TypeSpec {
    pub(crate) fn matches(&self, value: &Value) -> bool {
        match self {
            TypeSpec::Any => true,
            TypeSpec::Nothing => false,
            TypeSpec::Atom(atom) => atom.matches(value),
            TypeSpec::Cons { car, cdr } => value.as_cons().is_some_and(|cell| {
                car.as_ref().is_none_or(|spec| spec.matches(&cell.car))
                    && cdr.as_ref().is_none_or(|spec| spec.matches(&cell.cdr))
            }),
            TypeSpec::Eql(expected) => expected.eql(value),
            TypeSpec::Member(options) => options.iter().any(|option| option.eql(value)),
            TypeSpec::And(parts) => parts.iter().all(|part| part.matches(value)),
            TypeSpec::Or(parts) => parts.iter().any(|part| part.matches(value)),
            TypeSpec::Not(inner) => !inner.matches(value),
            TypeSpec::Satisfies(name) => predicate_registry()
                .get(*name)
                .is_some_and(|pred| pred(value)),
        }
    }
}

#[cold]
fn invalid(form: &Value) -> TypeSpecError {
    TypeSpecError::Invalid(format!("invalid type specifier `{form}`"))
}

/// Parse a type-specifier form.
pub(crate) fn parse_type_spec(form: &Value) -> Result<TypeSpec, TypeSpecError> {
    match form {
        Value::Nil => Ok(TypeSpec::Nothing),
        Value::Sym(name) => parse_atom_name(*name, form),
        Value::Cons(_) => parse_compound(form),
        _ => Err(invalid(form)),
    }
}

fn parse_atom_name(name: Name, form: &Value) -> Result<TypeSpec, TypeSpecError> {
    let spec = match name.as_str() {
        "t" => TypeSpec::Any,
        "symbol" => TypeSpec::Atom(AtomType::Symbol),
        "integer" => TypeSpec::Atom(AtomType::Integer),
        "float" => TypeSpec::Atom(AtomType::Float),
        "number" => TypeSpec::Atom(AtomType::Number),
        "character" => TypeSpec::Atom(AtomType::Character),
        "string" => TypeSpec::Atom(AtomType::String),
        "null" => TypeSpec::Atom(AtomType::Null),
        "cons" => TypeSpec::Atom(AtomType::Cons),
        "list" => TypeSpec::Atom(AtomType::List),
        "atom" => TypeSpec::Atom(AtomType::Atom),
        _ => return Err(invalid(form)),
    };
    Ok(spec)
}

fn parse_compound(form: &Value) -> Result<TypeSpec, TypeSpecError> {
    let Some(head) = form.head_symbol() else {
        return Err(invalid(form));
    };
    let mut iter = form.items();
    iter.next();
    let args: Vec<&Value> = (&mut iter).collect();
    if !iter.tail().is_nil() {
        return Err(invalid(form));
    }
    match head.as_str() {
        "cons" => {
            if args.len() > 2 {
                return Err(invalid(form));
            }
            let mut parsed = args.iter().map(|arg| parse_type_spec(arg));
            let car = parsed.next().transpose()?.map(Box::new);
            let cdr = parsed.next().transpose()?.map(Box::new);
            Ok(TypeSpec::Cons { car, cdr })
        }
        "eql" => match args.as_slice() {
            [value] => Ok(TypeSpec::Eql((*value).clone())),
            _ => Err(invalid(form)),
        },
        "member" => Ok(TypeSpec::Member(
            args.into_iter().cloned().collect::<Vec<Value>>(),
        )),
        "and" => Ok(TypeSpec::And(parse_all(&args)?)),
        "or" => Ok(TypeSpec::Or(parse_all(&args)?)),
        "not" => match args.as_slice() {
            [inner] => Ok(TypeSpec::Not(Box::new(parse_type_spec(inner)?))),
            _ => Err(invalid(form)),
        },
        "satisfies" => match args.as_slice() {
            [Value::Sym(name)] => {
                if predicate_registry().get(*name).is_some() {
                    Ok(TypeSpec::Satisfies(*name))
                } else {
                    Err(TypeSpecError::UnknownPredicate(*name))
                }
            }
            _ => Err(invalid(form)),
        },
        _ => Err(invalid(form)),
    }
}

fn parse_all(args: &[&Value]) -> Result<Vec<TypeSpec>, TypeSpecError> {
    args.iter().map(|arg| parse_type_spec(arg)).collect()
}

/// If `spec` is `(cons (eql S))` (with an unconstrained cdr), a
/// member-of-symbols variant, or a union of those, the head symbols it
/// covers — these entries take the cons fast path.
pub(crate) fn cons_heads(spec: &TypeSpec) -> Option<Vec<Name>> {
    fn cdr_unconstrained(cdr: &Option<Box<TypeSpec>>) -> bool {
        match cdr {
            None => true,
            Some(spec) => **spec == TypeSpec::Any,
        }
    }
    match spec {
        TypeSpec::Cons {
            car: Some(car),
            cdr,
        } if cdr_unconstrained(cdr) => match &**car {
            TypeSpec::Eql(Value::Sym(name)) => Some(vec![*name]),
            TypeSpec::Member(options) => options
                .iter()
                .map(|option| match option {
                    Value::Sym(name) => Some(*name),
                    _ => None,
                })
                .collect(),
            _ => None,
        },
        TypeSpec::Or(parts) => {
            let mut heads = Vec::new();
            for part in parts {
                heads.extend(cons_heads(part)?);
            }
            Some(heads)
        }
        _ => None,
    }
}

/// Process-wide registry of named predicates (the type environment).
///
/// A generation counter increments on every registration; deferred dispatch
/// entries use it to notice that a retry might now succeed.
pub struct PredicateRegistry {
    map: RwLock<FxHashMap<Name, TypePredicate>>,
    generation: AtomicU64,
}

impl PredicateRegistry {
    fn new() -> Self {
        PredicateRegistry {
            map: RwLock::new(FxHashMap::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn get(&self, name: Name) -> Option<TypePredicate> {
        self.map.read().get(&name).copied()
    }

    pub fn register(&self, name: &str, predicate: TypePredicate) {
        self.map.write().insert(intern(name), predicate);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// The process-wide predicate registry.
pub fn predicate_registry() -> &'static PredicateRegistry {
    static INSTANCE: OnceLock<PredicateRegistry> = OnceLock::new();
    INSTANCE.get_or_init(PredicateRegistry::new)
}

/// Register a named predicate for use in `(satisfies NAME)` specifiers.
pub fn register_type_predicate(name: &str, predicate: TypePredicate) {
    predicate_registry().register(name, predicate);
}
