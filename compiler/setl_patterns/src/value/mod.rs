//! Runtime values of the SetlX evaluator.
//!
//! `Value` is a closed sum type. Every heap-backed variant stores its payload
//! behind `Rc`, so `clone()` is a pointer copy; mutators go through
//! `Rc::make_mut` and never disturb other holders of the same storage.
//!
//! Construct values through the factory methods (`Value::int`,
//! `Value::list`, `Value::set`, ...) rather than the variants, so that sets
//! stay deduplicated and rationals stay normalised.

mod collection;
mod composite;
mod display;
mod ordering;
mod rational;
mod string;

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use num_bigint::BigInt;
use ordered_float::OrderedFloat;
use setl_ir::{ClassDef, Name, ProcedureDef};

pub use collection::Members;
pub use composite::{ObjectValue, ProcedureValue, TermValue};
pub use rational::Rational;
pub use string::SetlString;

use crate::matrix::Matrix;
use crate::scope::{LocalScope, Scope};

/// Runtime value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// `om`
    #[default]
    Undefined,
    /// `_` inside patterns; matches anything.
    Ignore,
    Bool(bool),
    /// Exact number; integers are rationals with denominator one.
    Rational(Rational),
    Float(OrderedFloat<f64>),
    Str(SetlString),
    List(Rc<Vec<Value>>),
    /// Sorted and deduplicated; a set of pairs doubles as a map.
    Set(Rc<BTreeSet<Value>>),
    Matrix(Matrix),
    Term(TermValue),
    Procedure(Rc<ProcedureValue>),
    /// Predefined procedure, resolved by name when called.
    Builtin(Name),
    Class(Rc<ClassDef>),
    Object(ObjectValue),
    /// What a `catch` variable holds for an error raised by the evaluator.
    Error(Rc<str>),
}

// Factory methods

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Rational(Rational::from_integer(n))
    }

    #[inline]
    pub fn integer(n: BigInt) -> Self {
        Value::Rational(Rational::from_integer(n))
    }

    #[inline]
    pub fn rational(r: Rational) -> Self {
        Value::Rational(r)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(OrderedFloat(f))
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(SetlString::new(s))
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    /// Set of `items`; duplicates collapse.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(Rc::new(items.into_iter().collect()))
    }

    pub fn empty_set() -> Self {
        Value::Set(Rc::new(BTreeSet::new()))
    }

    /// `[a, b]`, the element type of maps.
    pub fn pair(a: Value, b: Value) -> Self {
        Value::list(vec![a, b])
    }

    pub fn term(functional_character: impl Into<Name>, args: Vec<Value>) -> Self {
        Value::Term(TermValue::new(functional_character, args))
    }

    pub fn procedure(def: Rc<ProcedureDef>, captured: Option<LocalScope<Scope>>) -> Self {
        Value::Procedure(Rc::new(ProcedureValue::new(def, captured)))
    }

    pub fn builtin(name: impl Into<Name>) -> Self {
        Value::Builtin(name.into())
    }

    pub fn object(class: Rc<ClassDef>, members: BTreeMap<Name, Value>) -> Self {
        Value::Object(ObjectValue::new(class, members))
    }

    pub fn error(message: impl AsRef<str>) -> Self {
        Value::Error(Rc::from(message.as_ref()))
    }
}

// Queries

impl Value {
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Rational(_) | Value::Float(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Rational(r) if r.is_integer())
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Value::List(_) | Value::Set(_) | Value::Str(_))
    }

    /// Whether calling this value runs code.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Procedure(_) | Value::Builtin(_) | Value::Class(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            Value::Rational(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        self.as_rational().and_then(Rational::to_integer)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_rational().and_then(Rational::to_i64)
    }

    /// Numeric value as a double.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Rational(r) => Some(r.to_f64()),
            Value::Float(f) => Some(f.0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<Value>> {
        match self {
            Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_term(&self) -> Option<&TermValue> {
        match self {
            Value::Term(t) => Some(t),
            _ => None,
        }
    }

    /// Both elements of a two-element list.
    pub fn as_pair(&self) -> Option<(&Value, &Value)> {
        match self.as_list() {
            Some([a, b]) => Some((a, b)),
            _ => None,
        }
    }

    /// Whether this is a set whose every element is a pair.
    pub fn is_map(&self) -> bool {
        self.as_set()
            .is_some_and(|s| s.iter().all(|e| e.as_pair().is_some()))
    }

    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "om",
            Value::Ignore => "ignore",
            Value::Bool(_) => "boolean",
            Value::Rational(r) if r.is_integer() => "integer",
            Value::Rational(_) => "rational",
            Value::Float(_) => "double",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Matrix(_) => "matrix",
            Value::Term(_) => "term",
            Value::Procedure(_) | Value::Builtin(_) => "procedure",
            Value::Class(_) => "class",
            Value::Object(_) => "object",
            Value::Error(_) => "error",
        }
    }

    /// Whether mutating `self` would be visible through `other`; only true
    /// for values sharing heap storage.
    pub fn shares_storage(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a.shares_storage(b),
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Set(a), Value::Set(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Rational> for Value {
    fn from(r: Rational) -> Self {
        Value::Rational(r)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
