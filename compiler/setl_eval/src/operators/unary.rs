//! Unary operator implementations.

use num_bigint::BigInt;
use num_traits::{One, Signed};
use setl_ir::{BinaryOp, UnaryOp};
use setl_patterns::errors::{
    incompatible_type, not_a_boolean, not_an_integer, number_too_large, undefined_operation,
};
use setl_patterns::{value_to_term, LinearAlgebra, Rational, Value, ValueResult};

use super::{evaluate_binary, float_result};

/// Evaluate `op operand`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Mirrors evaluate_binary; callers hand over the evaluated operand"
)]
pub fn evaluate_unary(operand: Value, op: UnaryOp, linear: &dyn LinearAlgebra) -> ValueResult {
    if let Value::Term(_) = operand {
        if !matches!(op, UnaryOp::Cardinality) {
            return Ok(Value::term(
                op.node_kind().functional_character(),
                vec![value_to_term(&operand)],
            ));
        }
    }
    match op {
        UnaryOp::Minus => negate(&operand, linear),
        UnaryOp::Not => match operand.as_bool() {
            Some(b) => Ok(Value::Bool(!b)),
            None => Err(not_a_boolean("Operand", &operand)),
        },
        UnaryOp::Cardinality => {
            let size = operand.size()?;
            Ok(Value::integer(BigInt::from(size)))
        }
        UnaryOp::Factorial => factorial(&operand),
        UnaryOp::SumMembers => fold_members(&operand, BinaryOp::Sum, linear),
        UnaryOp::ProductMembers => fold_members(&operand, BinaryOp::Product, linear),
    }
}

fn negate(operand: &Value, linear: &dyn LinearAlgebra) -> ValueResult {
    match operand {
        Value::Rational(r) => Ok(Value::Rational(r.neg())),
        Value::Float(f) => float_result(-f.0),
        Value::Matrix(m) => Ok(Value::Matrix(linear.scale(m, -1.0))),
        _ => Err(incompatible_type(format!(
            "Operand \"{operand}\" of unary minus is not a number."
        ))),
    }
}

/// Largest `n` accepted by `n!`; the result has about 456 thousand digits.
const MAX_FACTORIAL_OPERAND: u32 = 100_000;

fn factorial(operand: &Value) -> ValueResult {
    let Some(n) = operand.as_integer() else {
        return Err(not_an_integer("Operand of factorial", operand));
    };
    if n.is_negative() {
        return Err(undefined_operation(format!(
            "Factorial of the negative number {n} is undefined."
        )));
    }
    if n > &BigInt::from(MAX_FACTORIAL_OPERAND) {
        return Err(number_too_large(n));
    }
    let mut acc = BigInt::one();
    let mut i = BigInt::from(2);
    while &i <= n {
        acc *= &i;
        i += 1;
    }
    Ok(Value::Rational(Rational::from_integer(acc)))
}

/// `+/ c` and `*/ c`: fold the members with the operator, `om` when empty.
fn fold_members(collection: &Value, op: BinaryOp, linear: &dyn LinearAlgebra) -> ValueResult {
    let mut members = collection.members()?;
    let Some(mut acc) = members.next() else {
        return Ok(Value::Undefined);
    };
    for member in members {
        acc = evaluate_binary(acc, member, op, linear)?;
    }
    Ok(acc)
}
