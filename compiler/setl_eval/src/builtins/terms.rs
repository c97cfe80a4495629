//! Type predicates, string conversion, and term builtins.

use std::rc::Rc;

use setl_ir::NodeKind;
use setl_patterns::errors::{incompatible_type, not_an_integer, undefined_operation};
use setl_patterns::{EvalError, EvalResult, TermValue, Value};

use super::{string_arg, Arity, BuiltinRegistry};
use crate::Interpreter;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add("str", Arity::Exact(1), to_str);
    registry.add("char", Arity::Exact(1), from_code_point);
    registry.add("isProcedure", Arity::Exact(1), is_procedure);
    registry.add("isString", Arity::Exact(1), is_string);
    registry.add("isList", Arity::Exact(1), is_list);
    registry.add("isSet", Arity::Exact(1), is_set);
    registry.add("isTerm", Arity::Exact(1), is_term);
    registry.add("isNumber", Arity::Exact(1), is_number);
    registry.add("isInteger", Arity::Exact(1), is_integer);
    registry.add("isBoolean", Arity::Exact(1), is_boolean);
    registry.add("fct", Arity::Exact(1), fct);
    registry.add("args", Arity::Exact(1), term_args);
    registry.add("makeTerm", Arity::Exact(2), make_term);
    registry.add("evalTerm", Arity::Exact(1), eval_term);
    registry.add("executeTerm", Arity::Exact(1), execute_term);
}

/// Printed form; strings are returned unchanged.
fn to_str(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match &args[0] {
        s @ Value::Str(_) => Ok(s.clone()),
        other => Ok(Value::string(other.to_string())),
    }
}

/// `char(n)`: the one-character string with code point `n`.
fn from_code_point(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let code = &args[0];
    let Some(n) = code.as_i64() else {
        return Err(not_an_integer("Argument of char", code).into());
    };
    u32::try_from(n)
        .ok()
        .and_then(char::from_u32)
        .map(Value::string)
        .ok_or_else(|| undefined_operation(format!("{n} is not a character code.")).into())
}

fn is_procedure(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(Value::Bool(matches!(
        args[0],
        Value::Procedure(_) | Value::Builtin(_)
    )))
}

fn is_string(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(Value::Bool(matches!(args[0], Value::Str(_))))
}

fn is_list(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(Value::Bool(matches!(args[0], Value::List(_))))
}

fn is_set(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(Value::Bool(matches!(args[0], Value::Set(_))))
}

fn is_term(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(Value::Bool(matches!(args[0], Value::Term(_))))
}

fn is_number(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(Value::Bool(args[0].is_number()))
}

fn is_integer(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(Value::Bool(args[0].is_integer()))
}

fn is_boolean(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(Value::Bool(matches!(args[0], Value::Bool(_))))
}

fn term_arg<'a>(name: &str, value: &'a Value) -> Result<&'a TermValue, EvalError> {
    value
        .as_term()
        .ok_or_else(|| incompatible_type(format!("Argument \"{value}\" of {name}() is not a term.")))
}

/// Functional character of a term, as a string.
fn fct(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let term = term_arg("fct", &args[0])?;
    Ok(Value::string(term.functional_character().as_str()))
}

fn term_args(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let term = term_arg("args", &args[0])?;
    Ok(Value::list(term.args().to_vec()))
}

/// `makeTerm(fc, [args])`.
fn make_term(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let fc = string_arg("makeTerm", &args[0])?;
    if fc.is_empty() {
        return Err(incompatible_type("Functional character of makeTerm() is empty.").into());
    }
    let Some(members) = args[1].as_list() else {
        return Err(incompatible_type(format!(
            "Arguments \"{}\" of makeTerm() are not a list.",
            args[1]
        ))
        .into());
    };
    Ok(Value::term(fc, members.to_vec()))
}

/// Rebuild an expression from its term and evaluate it here.
fn eval_term(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let terms = Rc::clone(&interp.terms);
    let expr = terms.term_to_expr(&args[0])?;
    interp.eval(&expr)
}

/// Rebuild a statement or `^block` from its term and execute it here.
fn execute_term(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let terms = Rc::clone(&interp.terms);
    let term = &args[0];
    let is_block = term.as_term().is_some_and(|t| {
        t.functional_character().as_str() == NodeKind::Block.functional_character()
    });
    if is_block {
        let block = terms.term_to_block(term)?;
        interp.exec_block(&block)?;
    } else {
        let stmt = terms.term_to_stmt(term)?;
        interp.exec_stmt(&stmt)?;
    }
    Ok(Value::Undefined)
}
