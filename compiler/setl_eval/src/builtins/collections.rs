//! Collection builtins: member extraction, power sets, map domains,
//! ordering, random choice, `join` and `split`.

use rand::seq::SliceRandom;
use rand::Rng;
use setl_patterns::errors::{incompatible_type, not_a_collection, not_an_integer, number_too_large};
use setl_patterns::{EvalError, EvalResult, Value};

use super::{string_arg, Arity, BuiltinRegistry};
use crate::Interpreter;

/// Largest set `pow` accepts; the result has `2^n` members.
const MAX_POWER_SET_BASE: usize = 24;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add_rw("from", Arity::Exact(1), &[0], from);
    registry.add_rw("fromB", Arity::Exact(1), &[0], from);
    registry.add_rw("fromE", Arity::Exact(1), &[0], from_end);
    registry.add("arb", Arity::Exact(1), arb);
    registry.add("pow", Arity::Exact(1), pow);
    registry.add("domain", Arity::Exact(1), domain);
    registry.add("range", Arity::Exact(1), range);
    registry.add("sort", Arity::Exact(1), sort);
    registry.add("reverse", Arity::Exact(1), reverse);
    registry.add("shuffle", Arity::Exact(1), shuffle);
    registry.add("random", Arity::Range(0, 1), random);
    registry.add("rnd", Arity::Exact(1), rnd);
    registry.add("max", Arity::Exact(1), max);
    registry.add("min", Arity::Exact(1), min);
    registry.add("join", Arity::Exact(2), join);
    registry.add("split", Arity::Exact(2), split);
}

/// `from(rw c)`: remove and return the first member of `c`.
fn from(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(args[0].remove_first_member()?)
}

fn from_end(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(args[0].remove_last_member()?)
}

fn arb(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(args[0].first_member()?)
}

fn pow(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let Some(set) = args[0].as_set() else {
        return Err(incompatible_type(format!(
            "Operand of pow(\"{}\") is not a set.",
            args[0]
        ))
        .into());
    };
    if set.len() > MAX_POWER_SET_BASE {
        return Err(number_too_large(format!("2 ** {}", set.len())).into());
    }
    let members: Vec<&Value> = set.iter().collect();
    let subsets = (0..1_u32 << members.len()).map(|mask| {
        Value::set(
            members
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, member)| (*member).clone()),
        )
    });
    Ok(Value::set(subsets))
}

fn map_pairs<'a>(name: &str, value: &'a Value) -> Result<Vec<(&'a Value, &'a Value)>, EvalError> {
    let not_a_map = || incompatible_type(format!("Argument \"{value}\" of {name}() is not a map."));
    let set = value.as_set().ok_or_else(not_a_map)?;
    set.iter()
        .map(|pair| pair.as_pair().ok_or_else(not_a_map))
        .collect()
}

fn domain(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let pairs = map_pairs("domain", &args[0])?;
    Ok(Value::set(pairs.into_iter().map(|(k, _)| k.clone())))
}

fn range(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let pairs = map_pairs("range", &args[0])?;
    Ok(Value::set(pairs.into_iter().map(|(_, v)| v.clone())))
}

/// Lists sort by value order, sets become their (already sorted) list and
/// strings sort their characters.
fn sort(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match &args[0] {
        Value::List(items) => {
            let mut items = items.to_vec();
            items.sort();
            Ok(Value::list(items))
        }
        Value::Set(items) => Ok(Value::list(items.iter().cloned().collect())),
        Value::Str(s) => {
            let mut chars: Vec<char> = s.chars().collect();
            chars.sort_unstable();
            Ok(Value::string(chars.into_iter().collect::<String>()))
        }
        other => Err(not_a_collection(other).into()),
    }
}

fn reverse(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match &args[0] {
        Value::List(items) => Ok(Value::list(items.iter().rev().cloned().collect())),
        Value::Str(s) => Ok(Value::string(s.chars().rev().collect::<String>())),
        other => Err(incompatible_type(format!(
            "Argument \"{other}\" of reverse() is not a list or string."
        ))
        .into()),
    }
}

fn shuffle(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match &args[0] {
        Value::List(items) => {
            let mut items = items.to_vec();
            items.shuffle(&mut interp.rng);
            Ok(Value::list(items))
        }
        Value::Set(items) => {
            let mut items: Vec<Value> = items.iter().cloned().collect();
            items.shuffle(&mut interp.rng);
            Ok(Value::list(items))
        }
        Value::Str(s) => {
            let mut chars: Vec<char> = s.chars().collect();
            chars.shuffle(&mut interp.rng);
            Ok(Value::string(chars.into_iter().collect::<String>()))
        }
        other => Err(not_a_collection(other).into()),
    }
}

/// `random()` is a double in `[0, 1)`; `random(n)` an integer in `[0, n]`.
fn random(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    match args.first() {
        None => Ok(Value::float(interp.rng.gen::<f64>())),
        Some(bound) => random_integer(interp, bound),
    }
}

fn random_integer(interp: &mut Interpreter, bound: &Value) -> EvalResult {
    if !bound.is_integer() {
        return Err(not_an_integer("Argument of random", bound).into());
    }
    let n = bound.as_i64().ok_or_else(|| number_too_large(bound))?;
    let drawn = if n >= 0 {
        interp.rng.gen_range(0..=n)
    } else {
        interp.rng.gen_range(n..=0)
    };
    Ok(Value::int(drawn))
}

/// A random member of a collection (`om` when empty), or a random integer
/// up to an integer bound.
fn rnd(interp: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let value = &args[0];
    if value.is_integer() {
        return random_integer(interp, value);
    }
    let members: Vec<Value> = value.members()?.collect();
    Ok(members.choose(&mut interp.rng).cloned().unwrap_or_default())
}

fn max(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(args[0].members()?.max().unwrap_or_default())
}

fn min(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    Ok(args[0].members()?.min().unwrap_or_default())
}

/// `join(c, sep)`: members printed unquoted, separated by `sep`.
fn join(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let separator = string_arg("join", &args[1])?;
    let parts: Vec<String> = args[0]
        .members()?
        .map(|member| member.to_unquoted_string())
        .collect();
    Ok(Value::string(parts.join(separator)))
}

/// `split(s, sep)`; an empty separator splits into characters.
fn split(_: &mut Interpreter, args: &mut [Value]) -> EvalResult {
    let text = string_arg("split", &args[0])?;
    let separator = string_arg("split", &args[1])?;
    let parts: Vec<Value> = if separator.is_empty() {
        text.chars().map(Value::string).collect()
    } else {
        text.split(separator).map(Value::string).collect()
    };
    Ok(Value::list(parts))
}
