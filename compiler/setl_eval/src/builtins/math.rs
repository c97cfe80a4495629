//! Numeric builtins and matrix construction.

use num_bigint::BigInt;
use num_traits::FromPrimitive;
use setl_patterns::errors::{incompatible_type, number_too_large};
use setl_patterns::{EvalError, EvalResult, Matrix, Rational, Value, ValueResult};

use super::{number_arg, Arity, BuiltinRegistry};
use crate::operators::float_result;
use crate::Interpreter;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add("abs", Arity::Exact(1), abs);
    registry.add("sqrt", Arity::Exact(1), sqrt);
    registry.add("floor", Arity::Exact(1), floor);
    registry.add("ceil", Arity::Exact(1), ceil);
    registry.add("int", Arity::Exact(1), int);
    registry.add("rational", Arity::Exact(1), rational);
    registry.add("double", Arity::Exact(1), double);
    registry.add("atan2", Arity::Exact(2), atan2);
    registry.add("hypot", Arity::Exact(2), hypot);
    registry.add("matrix", Arity::Exact(1), matrix);
    registry.add("transpose", Arity::Exact(1), transpose);
    registry.add("det", Arity::Exact(1), determinant);
    registry.add("matrixDeterminant", Arity::Exact(1), determinant);
    registry.add("solve", Arity::Exact(2), solve);
    registry.add("eigenValues", Arity::Exact(1), eigenvalues);
    registry.add("eigenVectors", Arity::Exact(1), eigenvectors);
}

fn not_a_number(name: &str, value: &Value) -> EvalError {
    incompatible_type(format!("Argument \"{value}\" of {name}() is not a number."))
}

/// Integer value of a finite double.
fn float_to_integer(f: f64) -> ValueResult {
    BigInt::from_f64(f)
        .map(Value::integer)
        .ok_or_else(|| number_too_large(f))
}

fn abs(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match &args[0] {
        Value::Rational(r) => Ok(Value::rational(r.abs())),
        Value::Float(f) => Ok(Value::float(f.0.abs())),
        other => Err(not_a_number("abs", other).into()),
    }
}

fn sqrt(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let x = number_arg("sqrt", &args[0])?;
    Ok(float_result(x.sqrt())?)
}

fn floor(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match &args[0] {
        Value::Rational(r) => Ok(Value::integer(r.floor())),
        Value::Float(f) => Ok(float_to_integer(f.0.floor())?),
        other => Err(not_a_number("floor", other).into()),
    }
}

fn ceil(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match &args[0] {
        Value::Rational(r) => Ok(Value::integer(r.ceil())),
        Value::Float(f) => Ok(float_to_integer(f.0.ceil())?),
        other => Err(not_a_number("ceil", other).into()),
    }
}

/// Truncates numbers toward zero; strings that are not integers give `om`.
fn int(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match &args[0] {
        Value::Rational(r) if r.is_negative() => Ok(Value::integer(r.ceil())),
        Value::Rational(r) => Ok(Value::integer(r.floor())),
        Value::Float(f) => Ok(float_to_integer(f.0.trunc())?),
        Value::Str(s) => Ok(s
            .trim()
            .parse::<BigInt>()
            .map_or(Value::Undefined, Value::integer)),
        other => Err(not_a_number("int", other).into()),
    }
}

/// Exact value of a number; strings are read as `n` or `n/d`.
fn rational(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match &args[0] {
        Value::Rational(r) => Ok(Value::rational(r.clone())),
        Value::Float(f) => Rational::from_f64(f.0)
            .map(Value::rational)
            .ok_or_else(|| number_too_large(f.0).into()),
        Value::Str(s) => Ok(parse_rational(s.trim()).map_or(Value::Undefined, Value::rational)),
        other => Err(not_a_number("rational", other).into()),
    }
}

fn parse_rational(text: &str) -> Option<Rational> {
    match text.split_once('/') {
        Some((num, den)) => Rational::new(num.trim().parse().ok()?, den.trim().parse().ok()?),
        None => text.parse::<BigInt>().ok().map(Rational::from_integer),
    }
}

fn double(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match &args[0] {
        Value::Str(s) => Ok(s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map_or(Value::Undefined, Value::float)),
        other => Ok(float_result(number_arg("double", other)?)?),
    }
}

fn atan2(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let y = number_arg("atan2", &args[0])?;
    let x = number_arg("atan2", &args[1])?;
    Ok(float_result(y.atan2(x))?)
}

fn hypot(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let a = number_arg("hypot", &args[0])?;
    let b = number_arg("hypot", &args[1])?;
    Ok(float_result(a.hypot(b))?)
}

// Matrices

/// A matrix argument, or a list of number lists read as rows.
fn matrix_arg(name: &str, value: &Value) -> Result<Matrix, EvalError> {
    match value {
        Value::Matrix(m) => Ok(m.clone()),
        Value::List(rows) => {
            let rows = rows
                .iter()
                .map(|row| number_row(name, row))
                .collect::<Result<Vec<_>, _>>()?;
            Matrix::from_rows(&rows)
        }
        other => Err(incompatible_type(format!(
            "Argument \"{other}\" of {name}() is not a matrix."
        ))),
    }
}

fn number_row(name: &str, row: &Value) -> Result<Vec<f64>, EvalError> {
    match row {
        Value::List(items) => items.iter().map(|x| number_arg(name, x)).collect(),
        other => Err(incompatible_type(format!(
            "Row \"{other}\" of {name}() is not a list of numbers."
        ))),
    }
}

fn matrix(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(Value::Matrix(matrix_arg("matrix", &args[0])?))
}

fn transpose(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let m = matrix_arg("transpose", &args[0])?;
    Ok(Value::Matrix(interp.linear_algebra.transpose(&m)))
}

fn determinant(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let m = matrix_arg("det", &args[0])?;
    let det = interp.linear_algebra.determinant(&m)?;
    Ok(float_result(det)?)
}

/// `solve(a, b)`: `x` with `a * x == b`. A list `b` is a column vector.
fn solve(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let a = matrix_arg("solve", &args[0])?;
    let b = match &args[1] {
        Value::List(items) if items.iter().all(Value::is_number) => {
            let column = items
                .iter()
                .map(|x| number_arg("solve", x))
                .collect::<Result<Vec<_>, _>>()?;
            Matrix::new(column.len(), 1, column)?
        }
        other => matrix_arg("solve", other)?,
    };
    Ok(Value::Matrix(interp.linear_algebra.solve(&a, &b)?))
}

fn eigenvalues(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let m = matrix_arg("eigenValues", &args[0])?;
    let values = interp.linear_algebra.eigenvalues(&m)?;
    Ok(Value::list(values.into_iter().map(Value::float).collect()))
}

/// Unit eigenvectors as matrix columns, ordered like `eigenValues`.
fn eigenvectors(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let m = matrix_arg("eigenVectors", &args[0])?;
    Ok(Value::Matrix(interp.linear_algebra.eigenvectors(&m)?))
}
