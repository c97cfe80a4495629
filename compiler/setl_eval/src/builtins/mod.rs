//! Predefined procedures.
//!
//! Builtins are plain function pointers in a name-keyed table that is
//! built once per interpreter. A builtin receives the interpreter and its
//! evaluated arguments as a mutable slice; for `rw` positions (`from`,
//! `fromB`, `fromE`) the final slice entries are written back to the
//! caller's argument expressions, exactly like `rw` parameters of user
//! procedures.
//!
//! Groups:
//! - `io`: `print`, `nPrint`, `get`, `readFile`, `writeFile`, `appendFile`
//! - `collections`: member extraction, power set, maps, ordering, random
//!   choice, `join`/`split`
//! - `math`: number conversion, roots, rounding, matrices
//! - `terms`: type predicates, `str`, `char`, term construction and
//!   inspection, `evalTerm`/`executeTerm`

mod collections;
mod io;
mod math;
mod terms;

use rustc_hash::FxHashMap;
use setl_patterns::errors::{incompatible_type, undefined_operation, wrong_arg_count};
use setl_patterns::{EvalError, EvalResult, Value};

use crate::Interpreter;

/// Signature shared by all predefined procedures.
pub type BuiltinFn = fn(&mut Interpreter, &mut [Value]) -> EvalResult;

/// Accepted argument counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Between the bounds, inclusive.
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Range(lo, hi) => (lo..=hi).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }
}

pub struct Builtin {
    pub arity: Arity,
    pub(crate) func: BuiltinFn,
    /// Argument positions written back after the call.
    pub read_write: &'static [usize],
}

impl Builtin {
    pub(crate) fn check_arity(&self, name: &str, got: usize) -> Result<(), EvalError> {
        if self.arity.accepts(got) {
            return Ok(());
        }
        Err(match self.arity {
            Arity::Exact(n) => wrong_arg_count(name, n, got),
            Arity::Range(lo, hi) => undefined_operation(format!(
                "Procedure {name} takes between {lo} and {hi} arguments, but was called with {got}."
            )),
            Arity::AtLeast(n) => undefined_operation(format!(
                "Procedure {name} takes at least {n} arguments, but was called with {got}."
            )),
        })
    }
}

/// Name to predefined procedure.
pub struct BuiltinRegistry {
    table: FxHashMap<&'static str, Builtin>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        let mut registry = BuiltinRegistry {
            table: FxHashMap::default(),
        };
        io::register(&mut registry);
        collections::register(&mut registry);
        math::register(&mut registry);
        terms::register(&mut registry);
        registry
    }

    fn add(&mut self, name: &'static str, arity: Arity, func: BuiltinFn) {
        self.add_rw(name, arity, &[], func);
    }

    fn add_rw(
        &mut self,
        name: &'static str,
        arity: Arity,
        read_write: &'static [usize],
        func: BuiltinFn,
    ) {
        self.table.insert(
            name,
            Builtin {
                arity,
                func,
                read_write,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.table.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.table.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Argument helpers

fn string_arg<'a>(name: &str, value: &'a Value) -> Result<&'a str, EvalError> {
    value.as_str().ok_or_else(|| {
        incompatible_type(format!(
            "Argument \"{value}\" of {name}() is not a string."
        ))
    })
}

fn number_arg(name: &str, value: &Value) -> Result<f64, EvalError> {
    value.to_f64().ok_or_else(|| {
        incompatible_type(format!(
            "Argument \"{value}\" of {name}() is not a number."
        ))
    })
}

#[cfg(test)]
mod tests;
