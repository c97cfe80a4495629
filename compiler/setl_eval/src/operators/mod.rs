//! Operator implementations for the evaluator.
//!
//! Binary operators double-dispatch on both operand variants with one
//! exhaustive `match`; unsupported pairings are `IncompatibleType` errors.
//! The value set is closed, so enum matching is preferred over traits.
//!
//! Short-circuit connectives are decided in `exec::expr` before the right
//! operand is evaluated; by the time a value pair reaches this module both
//! sides have been computed.

mod unary;

pub use unary::evaluate_unary;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::rc::Rc;

use num_traits::ToPrimitive;
use setl_ir::BinaryOp;
use setl_patterns::errors::{
    division_by_zero, incompatible_operands, incompatible_type, negative_multiplier,
    not_a_boolean, not_an_integer, number_too_large, undefined_operation,
};
use setl_patterns::{value_to_term, EvalError, LinearAlgebra, Matrix, Rational, Value, ValueResult};

/// Evaluate `left op right`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Operands are owned by the caller and often moved into the result"
)]
pub fn evaluate_binary(
    left: Value,
    right: Value,
    op: BinaryOp,
    linear: &dyn LinearAlgebra,
) -> ValueResult {
    match op {
        BinaryOp::Equal => Ok(Value::Bool(left == right)),
        BinaryOp::NotEqual => Ok(Value::Bool(left != right)),
        BinaryOp::LessThan
        | BinaryOp::LessOrEqual
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterOrEqual => compare(&left, &right, op),
        BinaryOp::In => right.contains(&left).map(Value::Bool),
        BinaryOp::NotIn => right.contains(&left).map(|found| Value::Bool(!found)),
        BinaryOp::Conjunction
        | BinaryOp::Disjunction
        | BinaryOp::Implication
        | BinaryOp::Equivalence
        | BinaryOp::Antivalence => eval_bool_binary(&left, &right, op),
        BinaryOp::Sum
        | BinaryOp::Difference
        | BinaryOp::Product
        | BinaryOp::Quotient
        | BinaryOp::IntegerDivision
        | BinaryOp::Modulo
        | BinaryOp::Power => arithmetic(&left, &right, op, linear),
    }
}

fn arithmetic(left: &Value, right: &Value, op: BinaryOp, linear: &dyn LinearAlgebra) -> ValueResult {
    match (left, right) {
        (Value::Rational(a), Value::Rational(b)) => eval_rational_binary(a, b, op),
        (Value::Rational(_) | Value::Float(_), Value::Rational(_) | Value::Float(_)) => {
            let (Some(a), Some(b)) = (left.to_f64(), right.to_f64()) else {
                return Err(incompatible_operands(left, op.as_symbol(), right));
            };
            eval_float_binary(a, b, op)
        }
        (Value::Undefined, _) | (_, Value::Undefined) => {
            Err(incompatible_operands(left, op.as_symbol(), right))
        }
        (Value::Str(a), _) if op == BinaryOp::Sum => {
            Ok(Value::string(format!("{}{}", a.as_str(), right.to_unquoted_string())))
        }
        (_, Value::Str(b)) if op == BinaryOp::Sum => {
            Ok(Value::string(format!("{}{}", left.to_unquoted_string(), b.as_str())))
        }
        (Value::Term(_), _) | (_, Value::Term(_)) => Ok(symbolic(left, right, op)),
        (Value::Str(s), n) | (n, Value::Str(s)) if op == BinaryOp::Product => {
            let times = multiplier(n, "String")?;
            repeated_len(s.len(), times, n)?;
            Ok(Value::string(s.as_str().repeat(times)))
        }
        (Value::List(items), n @ Value::Rational(_)) | (n @ Value::Rational(_), Value::List(items))
            if op == BinaryOp::Product =>
        {
            let times = multiplier(n, "List")?;
            let mut out = Vec::with_capacity(repeated_len(items.len(), times, n)?);
            if !items.is_empty() {
                for _ in 0..times {
                    out.extend(items.iter().cloned());
                }
            }
            Ok(Value::list(out))
        }
        (Value::List(a), Value::List(b)) if op == BinaryOp::Sum => {
            let mut out = Vec::with_capacity(a.len() + b.len());
            out.extend(a.iter().cloned());
            out.extend(b.iter().cloned());
            Ok(Value::list(out))
        }
        (Value::Set(a), Value::Set(b)) => eval_set_binary(a, b, op)
            .ok_or_else(|| incompatible_operands(left, op.as_symbol(), right)),
        (Value::Matrix(_), _) | (_, Value::Matrix(_)) => eval_matrix_binary(left, right, op, linear),
        _ => Err(incompatible_operands(left, op.as_symbol(), right)),
    }
}

/// Term of the operator's node kind over both operands; arithmetic on
/// terms builds expressions instead of computing.
fn symbolic(left: &Value, right: &Value, op: BinaryOp) -> Value {
    Value::term(
        op.node_kind().functional_character(),
        vec![value_to_term(left), value_to_term(right)],
    )
}

/// Repetition count of `s * n`.
fn multiplier(n: &Value, kind: &str) -> Result<usize, EvalError> {
    let Some(i) = n.as_integer() else {
        return Err(incompatible_type(format!("{kind} multiplier \"{n}\" is not an integer.")));
    };
    if i.sign() == num_bigint::Sign::Minus {
        return Err(negative_multiplier(kind));
    }
    i.to_usize().ok_or_else(|| number_too_large(n))
}

/// Longest result of a string or list repetition: the largest collection
/// an index can reach.
const MAX_REPEATED_LEN: usize = 2_147_483_647;

/// Length of `len` members repeated `times` times, or `NumberTooLarge`.
fn repeated_len(len: usize, times: usize, n: &Value) -> Result<usize, EvalError> {
    len.checked_mul(times)
        .filter(|&total| total <= MAX_REPEATED_LEN)
        .ok_or_else(|| number_too_large(n))
}

fn eval_rational_binary(a: &Rational, b: &Rational, op: BinaryOp) -> ValueResult {
    match op {
        BinaryOp::Sum => Ok(Value::Rational(a.add(b))),
        BinaryOp::Difference => Ok(Value::Rational(a.sub(b))),
        BinaryOp::Product => Ok(Value::Rational(a.mul(b))),
        BinaryOp::Quotient => a.div(b).map(Value::Rational).ok_or_else(division_by_zero),
        BinaryOp::IntegerDivision => a.int_div(b).map(Value::Rational).ok_or_else(division_by_zero),
        BinaryOp::Modulo => a.modulo(b).map(Value::Rational).ok_or_else(division_by_zero),
        BinaryOp::Power => match b.to_integer() {
            Some(exp) => {
                let exp = exp.to_i64().ok_or_else(|| number_too_large(exp))?;
                if a.power_too_large(exp) {
                    return Err(number_too_large(format_args!("{a} ** {exp}")));
                }
                a.pow(exp).map(Value::Rational).ok_or_else(division_by_zero)
            }
            None => float_result(a.to_f64().powf(b.to_f64())),
        },
        _ => Err(incompatible_type(format!(
            "Operator {} is not defined for numbers.",
            op.as_symbol()
        ))),
    }
}

fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> ValueResult {
    let result = match op {
        BinaryOp::Sum => a + b,
        BinaryOp::Difference => a - b,
        BinaryOp::Product => a * b,
        BinaryOp::Quotient | BinaryOp::IntegerDivision | BinaryOp::Modulo if b == 0.0 => {
            return Err(division_by_zero())
        }
        BinaryOp::Quotient => a / b,
        BinaryOp::IntegerDivision => (a / b).floor(),
        BinaryOp::Modulo => a - b * (a / b).floor(),
        BinaryOp::Power => a.powf(b),
        _ => {
            return Err(incompatible_type(format!(
                "Operator {} is not defined for numbers.",
                op.as_symbol()
            )))
        }
    };
    float_result(result)
}

/// Doubles must stay finite and real.
pub(crate) fn float_result(f: f64) -> ValueResult {
    if f.is_nan() {
        return Err(undefined_operation("Result is not a number."));
    }
    if f.is_infinite() {
        return Err(number_too_large(f));
    }
    Ok(Value::float(f))
}

fn eval_set_binary(a: &Rc<BTreeSet<Value>>, b: &Rc<BTreeSet<Value>>, op: BinaryOp) -> Option<Value> {
    let result: BTreeSet<Value> = match op {
        BinaryOp::Sum => a.union(b).cloned().collect(),
        BinaryOp::Difference => a.difference(b).cloned().collect(),
        BinaryOp::Product => a.intersection(b).cloned().collect(),
        BinaryOp::Modulo => a.symmetric_difference(b).cloned().collect(),
        _ => return None,
    };
    Some(Value::Set(Rc::new(result)))
}

fn eval_matrix_binary(
    left: &Value,
    right: &Value,
    op: BinaryOp,
    linear: &dyn LinearAlgebra,
) -> ValueResult {
    let matrix = |m: Result<Matrix, EvalError>| m.map(Value::Matrix);
    match (left, right, op) {
        (Value::Matrix(a), Value::Matrix(b), BinaryOp::Sum) => matrix(linear.sum(a, b)),
        (Value::Matrix(a), Value::Matrix(b), BinaryOp::Difference) => {
            matrix(linear.difference(a, b))
        }
        (Value::Matrix(a), Value::Matrix(b), BinaryOp::Product) => matrix(linear.product(a, b)),
        (Value::Matrix(a), n, BinaryOp::Product) | (n, Value::Matrix(a), BinaryOp::Product)
            if n.is_number() =>
        {
            Ok(Value::Matrix(linear.scale(a, n.to_f64().unwrap_or(f64::NAN))))
        }
        (Value::Matrix(a), n, BinaryOp::Quotient) if n.is_number() => {
            let divisor = n.to_f64().unwrap_or(0.0);
            if divisor == 0.0 {
                return Err(division_by_zero());
            }
            Ok(Value::Matrix(linear.scale(a, 1.0 / divisor)))
        }
        (Value::Matrix(a), n, BinaryOp::Power) => {
            let Some(exp) = n.as_i64() else {
                return Err(not_an_integer("Matrix exponent", n));
            };
            matrix(linear.power(a, exp))
        }
        _ => Err(incompatible_operands(left, op.as_symbol(), right)),
    }
}

/// Ordering comparisons: numbers by value, sets by inclusion, strings,
/// lists and terms in the total order of values.
fn compare(left: &Value, right: &Value, op: BinaryOp) -> ValueResult {
    if let (Value::Set(a), Value::Set(b)) = (left, right) {
        let result = match op {
            BinaryOp::LessThan => a.len() < b.len() && a.is_subset(b),
            BinaryOp::LessOrEqual => a.is_subset(b),
            BinaryOp::GreaterThan => a.len() > b.len() && a.is_superset(b),
            _ => a.is_superset(b),
        };
        return Ok(Value::Bool(result));
    }
    let comparable = (left.is_number() && right.is_number())
        || matches!(
            (left, right),
            (Value::Str(_), Value::Str(_))
                | (Value::List(_), Value::List(_))
                | (Value::Term(_), Value::Term(_))
        );
    if !comparable {
        return Err(incompatible_operands(left, op.as_symbol(), right));
    }
    let ordering = left.cmp(right);
    let result = match op {
        BinaryOp::LessThan => ordering == Ordering::Less,
        BinaryOp::LessOrEqual => ordering != Ordering::Greater,
        BinaryOp::GreaterThan => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    };
    Ok(Value::Bool(result))
}

fn eval_bool_binary(left: &Value, right: &Value, op: BinaryOp) -> ValueResult {
    let Some(a) = left.as_bool() else {
        return Err(not_a_boolean("Left-hand side", left));
    };
    let Some(b) = right.as_bool() else {
        return Err(not_a_boolean("Right-hand side", right));
    };
    let result = match op {
        BinaryOp::Conjunction => a && b,
        BinaryOp::Disjunction => a || b,
        BinaryOp::Implication => !a || b,
        BinaryOp::Equivalence => a == b,
        _ => a != b,
    };
    Ok(Value::Bool(result))
}
