//! Total order over all values.
//!
//! Values of different kinds order by a fixed rank; values of the same kind
//! by content. Rationals and doubles share a rank and compare exactly, so
//! `1 == 1.0` and `1/3 != 0.3333333333333333`.

use std::cmp::Ordering;
use std::rc::Rc;

use super::{Rational, Value};

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Undefined => 0,
            Value::Ignore => 1,
            Value::Bool(_) => 2,
            Value::Rational(_) | Value::Float(_) => 3,
            Value::Matrix(_) => 4,
            Value::Str(_) => 5,
            Value::Set(_) => 6,
            Value::List(_) => 7,
            Value::Term(_) => 8,
            Value::Error(_) => 9,
            Value::Procedure(_) => 10,
            Value::Builtin(_) => 11,
            Value::Class(_) => 12,
            Value::Object(_) => 13,
        }
    }
}

/// Exact comparison of a rational with a double; NaN sorts above every
/// number, as it does among doubles.
fn cmp_rational_float(r: &Rational, f: f64) -> Ordering {
    if f.is_nan() || f == f64::INFINITY {
        return Ordering::Less;
    }
    if f == f64::NEG_INFINITY {
        return Ordering::Greater;
    }
    match Rational::from_f64(f) {
        Some(exact) => r.cmp(&exact),
        None => Ordering::Less,
    }
}

fn ptr_cmp<T>(a: &Rc<T>, b: &Rc<T>) -> Ordering {
    Rc::as_ptr(a).cast::<()>().cmp(&Rc::as_ptr(b).cast::<()>())
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Ignore, Value::Ignore) => {
                Ordering::Equal
            }
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Rational(a), Value::Rational(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.cmp(b),
            (Value::Rational(a), Value::Float(b)) => cmp_rational_float(a, b.0),
            (Value::Float(a), Value::Rational(b)) => cmp_rational_float(b, a.0).reverse(),
            (Value::Matrix(a), Value::Matrix(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.as_str().cmp(b.as_str()),
            (Value::Set(a), Value::Set(b)) => a.iter().cmp(b.iter()),
            (Value::List(a), Value::List(b)) => a.iter().cmp(b.iter()),
            (Value::Term(a), Value::Term(b)) => a
                .functional_character()
                .cmp(b.functional_character())
                .then_with(|| a.args().iter().cmp(b.args().iter())),
            (Value::Error(a), Value::Error(b)) => a.cmp(b),
            (Value::Procedure(a), Value::Procedure(b)) => ptr_cmp(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.cmp(b),
            (Value::Class(a), Value::Class(b)) => ptr_cmp(a, b),
            (Value::Object(a), Value::Object(b)) => ptr_cmp(a.class(), b.class())
                .then_with(|| a.members().iter().cmp(b.members().iter())),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}
