#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::rc::Rc;

use pretty_assertions::assert_eq;
use setl_ir::build::*;
use setl_ir::{BinaryOp, Expr};
use setl_patterns::{ControlAction, EvalErrorKind, Rational, Value};

use super::BuiltinRegistry;
use crate::io_handler::MemoryIoHandler;
use crate::print_handler::buffer_handler;
use crate::Interpreter;

fn interpreter() -> Interpreter {
    Interpreter::builder()
        .print_handler(buffer_handler())
        .seed(7)
        .build()
}

fn eval(interp: &mut Interpreter, expr: &Expr) -> Value {
    interp.eval(expr).unwrap()
}

fn eval_fresh(expr: &Expr) -> Value {
    eval(&mut interpreter(), expr)
}

fn error_kind(expr: &Expr) -> EvalErrorKind {
    match interpreter().eval(expr) {
        Err(ControlAction::Error(e)) => e.kind,
        other => panic!("expected an error, got {other:?}"),
    }
}

fn ints(items: &[i64]) -> Vec<Expr> {
    items.iter().copied().map(int).collect()
}

fn int_values(items: &[i64]) -> Vec<Value> {
    items.iter().copied().map(Value::int).collect()
}

fn half() -> Value {
    Value::rational(Rational::new(1.into(), 2.into()).unwrap())
}

// Registry

#[test]
fn registry_covers_predefined_procedures() {
    let registry = BuiltinRegistry::new();
    for name in [
        "print", "nPrint", "str", "char", "abs", "isProcedure", "isString", "isList", "isSet",
        "isTerm", "isNumber", "isInteger", "isBoolean", "fct", "args", "makeTerm", "from",
        "fromB", "fromE", "arb", "pow", "domain", "range", "sort", "reverse", "shuffle",
        "random", "rnd", "max", "min", "join", "split", "sqrt", "floor", "ceil", "int",
        "rational", "double", "atan2", "hypot", "matrix", "transpose", "det",
        "matrixDeterminant", "solve", "eigenValues", "eigenVectors", "get", "readFile",
        "writeFile", "appendFile", "evalTerm", "executeTerm",
    ] {
        assert!(registry.contains(name), "{name} is not registered");
    }
    assert!(!registry.contains("parse"));
    assert_eq!(registry.names().len(), registry.len());
}

#[test]
fn wrong_argument_count_is_undefined_operation() {
    assert_eq!(
        error_kind(&call_named("sort", vec![])),
        EvalErrorKind::UndefinedOperation
    );
    assert_eq!(
        error_kind(&call_named("random", ints(&[1, 2]))),
        EvalErrorKind::UndefinedOperation
    );
}

#[test]
fn builtin_names_evaluate_to_procedures() {
    let value = eval_fresh(&var("sort"));
    assert!(matches!(value, Value::Builtin(_)));
    assert_eq!(
        eval_fresh(&call_named("isProcedure", vec![var("sort")])),
        Value::Bool(true)
    );
}

// Output

#[test]
fn print_joins_arguments_unquoted() {
    let mut interp = interpreter();
    eval(
        &mut interp,
        &call_named("print", vec![string("x = "), int(1), list(vec![string("a")])]),
    );
    eval(&mut interp, &call_named("nPrint", vec![string("no newline")]));
    assert_eq!(interp.get_print_output(), "x = 1[\"a\"]\nno newline");
}

// Collections

#[test]
fn from_takes_members_out_of_the_argument_variable() {
    let mut interp = interpreter();
    interp
        .execute_program(&block(vec![
            stmt(assign(var("xs"), list(ints(&[1, 2, 3])))),
            stmt(assign(var("first"), call_named("from", vec![var("xs")]))),
            stmt(assign(var("s"), set(ints(&[1, 2, 3])))),
            stmt(assign(var("last"), call_named("fromE", vec![var("s")]))),
        ]))
        .unwrap();
    assert_eq!(interp.lookup("first").unwrap(), Value::int(1));
    assert_eq!(interp.lookup("xs").unwrap(), Value::list(int_values(&[2, 3])));
    assert_eq!(interp.lookup("last").unwrap(), Value::int(3));
    assert_eq!(interp.lookup("s").unwrap(), Value::set(int_values(&[1, 2])));
}

#[test]
fn from_on_empty_collection_is_om() {
    assert_eq!(eval_fresh(&call_named("from", vec![list(vec![])])), Value::Undefined);
    assert_eq!(eval_fresh(&call_named("arb", vec![set(vec![])])), Value::Undefined);
}

#[test]
fn pow_builds_every_subset() {
    let expected = Value::set(vec![
        Value::empty_set(),
        Value::set(int_values(&[1])),
        Value::set(int_values(&[2])),
        Value::set(int_values(&[1, 2])),
    ]);
    assert_eq!(eval_fresh(&call_named("pow", vec![set(ints(&[1, 2]))])), expected);
    assert_eq!(
        error_kind(&call_named("pow", vec![list(ints(&[1]))])),
        EvalErrorKind::IncompatibleType
    );
}

#[test]
fn domain_and_range_need_maps() {
    let map = set(vec![
        list(vec![int(1), string("a")]),
        list(vec![int(2), string("b")]),
    ]);
    assert_eq!(
        eval_fresh(&call_named("domain", vec![map.clone()])),
        Value::set(int_values(&[1, 2]))
    );
    assert_eq!(
        eval_fresh(&call_named("range", vec![map])),
        Value::set(vec![Value::string("a"), Value::string("b")])
    );
    assert_eq!(
        error_kind(&call_named("domain", vec![set(ints(&[1]))])),
        EvalErrorKind::IncompatibleType
    );
}

#[test]
fn sort_and_reverse() {
    assert_eq!(
        eval_fresh(&call_named("sort", vec![list(ints(&[3, 1, 2]))])),
        Value::list(int_values(&[1, 2, 3]))
    );
    assert_eq!(eval_fresh(&call_named("sort", vec![string("cab")])), Value::string("abc"));
    assert_eq!(
        eval_fresh(&call_named("reverse", vec![list(ints(&[1, 2]))])),
        Value::list(int_values(&[2, 1]))
    );
    assert_eq!(eval_fresh(&call_named("reverse", vec![string("abc")])), Value::string("cba"));
}

#[test]
fn seeded_random_repeats() {
    let draw = || {
        let mut interp = interpreter();
        (0..5)
            .map(|_| eval(&mut interp, &call_named("random", ints(&[100]))))
            .collect::<Vec<_>>()
    };
    let first = draw();
    assert_eq!(first, draw());
    for value in first {
        let n = value.as_i64().unwrap();
        assert!((0..=100).contains(&n));
    }
    let unit = eval_fresh(&call_named("random", vec![])).to_f64().unwrap();
    assert!((0.0..1.0).contains(&unit));
}

#[test]
fn shuffle_and_rnd_keep_members() {
    let shuffled = eval_fresh(&call_named("shuffle", vec![list(ints(&[1, 2, 3, 4, 5]))]));
    let mut members = shuffled.as_list().unwrap().to_vec();
    members.sort();
    assert_eq!(members, int_values(&[1, 2, 3, 4, 5]));

    let picked = eval_fresh(&call_named("rnd", vec![set(ints(&[4, 5, 6]))]));
    assert!([4, 5, 6].contains(&picked.as_i64().unwrap()));
    assert_eq!(eval_fresh(&call_named("rnd", vec![list(vec![])])), Value::Undefined);
}

#[test]
fn max_and_min_of_members() {
    assert_eq!(eval_fresh(&call_named("max", vec![set(ints(&[3, 1, 2]))])), Value::int(3));
    assert_eq!(eval_fresh(&call_named("min", vec![list(ints(&[3, 1, 2]))])), Value::int(1));
    assert_eq!(eval_fresh(&call_named("max", vec![list(vec![])])), Value::Undefined);
}

#[test]
fn join_and_split() {
    assert_eq!(
        eval_fresh(&call_named("join", vec![list(ints(&[1, 2, 3])), string("-")])),
        Value::string("1-2-3")
    );
    assert_eq!(
        eval_fresh(&call_named("split", vec![string("a,b"), string(",")])),
        Value::list(vec![Value::string("a"), Value::string("b")])
    );
    assert_eq!(
        eval_fresh(&call_named("split", vec![string("ab"), string("")])),
        Value::list(vec![Value::string("a"), Value::string("b")])
    );
}

// Numbers

#[test]
fn integer_conversions() {
    assert_eq!(eval_fresh(&call_named("int", vec![float(-2.7)])), Value::int(-2));
    assert_eq!(eval_fresh(&call_named("int", vec![string(" 12 ")])), Value::int(12));
    assert_eq!(eval_fresh(&call_named("int", vec![string("x")])), Value::Undefined);
    let minus_half = binary(BinaryOp::Quotient, int(-1), int(2));
    assert_eq!(eval_fresh(&call_named("floor", vec![minus_half.clone()])), Value::int(-1));
    assert_eq!(eval_fresh(&call_named("ceil", vec![minus_half])), Value::int(0));
    assert_eq!(eval_fresh(&call_named("abs", vec![int(-3)])), Value::int(3));
}

#[test]
fn rational_and_double_conversions() {
    assert_eq!(eval_fresh(&call_named("rational", vec![float(0.5)])), half());
    assert_eq!(eval_fresh(&call_named("rational", vec![string("2/4")])), half());
    assert_eq!(eval_fresh(&call_named("double", vec![string("x")])), Value::Undefined);
    assert_eq!(
        eval_fresh(&call_named("double", vec![binary(BinaryOp::Quotient, int(1), int(2))])),
        Value::float(0.5)
    );
}

#[test]
fn float_functions_stay_finite() {
    assert_eq!(eval_fresh(&call_named("sqrt", ints(&[9]))), Value::float(3.0));
    assert_eq!(eval_fresh(&call_named("hypot", ints(&[3, 4]))), Value::float(5.0));
    assert_eq!(
        error_kind(&call_named("sqrt", ints(&[-1]))),
        EvalErrorKind::UndefinedOperation
    );
    assert_eq!(
        error_kind(&call_named("sqrt", vec![string("4")])),
        EvalErrorKind::IncompatibleType
    );
}

#[test]
fn matrix_builtins_use_the_backend() {
    let rows = list(vec![list(ints(&[1, 2])), list(ints(&[3, 4]))]);
    let det = eval_fresh(&call_named("det", vec![call_named("matrix", vec![rows.clone()])]));
    assert!((det.to_f64().unwrap() + 2.0).abs() < 1e-9);

    let transposed = eval_fresh(&call_named("transpose", vec![rows]));
    let Value::Matrix(m) = transposed else {
        panic!("expected a matrix");
    };
    assert_eq!(m.to_rows(), vec![vec![1.0, 3.0], vec![2.0, 4.0]]);

    let a = list(vec![list(ints(&[2, 0])), list(ints(&[0, 4]))]);
    let Value::Matrix(x) = eval_fresh(&call_named("solve", vec![a, list(ints(&[2, 8]))])) else {
        panic!("expected a matrix");
    };
    assert!((x.get(0, 0).unwrap() - 1.0).abs() < 1e-9);
    assert!((x.get(1, 0).unwrap() - 2.0).abs() < 1e-9);

    let diagonal = list(vec![list(ints(&[5, 0])), list(ints(&[0, -1]))]);
    let Value::Matrix(v) = eval_fresh(&call_named("eigenVectors", vec![diagonal])) else {
        panic!("expected a matrix");
    };
    assert_eq!(v.to_rows(), vec![vec![0.0, 1.0], vec![1.0, 0.0]]);

    assert_eq!(
        error_kind(&call_named("matrix", vec![list(vec![list(ints(&[1])), list(ints(&[1, 2]))])])),
        EvalErrorKind::MatrixError
    );
}

// Terms and types

#[test]
fn type_predicates() {
    assert_eq!(eval_fresh(&call_named("isString", vec![string("a")])), Value::Bool(true));
    assert_eq!(eval_fresh(&call_named("isList", vec![set(vec![])])), Value::Bool(false));
    assert_eq!(eval_fresh(&call_named("isInteger", vec![float(1.0)])), Value::Bool(false));
    assert_eq!(eval_fresh(&call_named("isNumber", vec![float(1.0)])), Value::Bool(true));
    assert_eq!(eval_fresh(&call_named("isBoolean", vec![boolean(true)])), Value::Bool(true));
    assert_eq!(
        eval_fresh(&call_named("isTerm", vec![term("f", ints(&[1]))])),
        Value::Bool(true)
    );
}

#[test]
fn str_and_char() {
    assert_eq!(eval_fresh(&call_named("str", vec![string("a")])), Value::string("a"));
    assert_eq!(
        eval_fresh(&call_named("str", vec![list(vec![string("a")])])),
        Value::string("[\"a\"]")
    );
    assert_eq!(eval_fresh(&call_named("char", ints(&[65]))), Value::string("A"));
}

#[test]
fn term_inspection_and_construction() {
    let t = term("foo", ints(&[1, 2]));
    assert_eq!(eval_fresh(&call_named("fct", vec![t.clone()])), Value::string("foo"));
    assert_eq!(
        eval_fresh(&call_named("args", vec![t])),
        Value::list(int_values(&[1, 2]))
    );
    assert_eq!(
        eval_fresh(&call_named("makeTerm", vec![string("foo"), list(ints(&[1]))])),
        Value::term("foo", int_values(&[1]))
    );
    assert_eq!(
        error_kind(&call_named("fct", ints(&[1]))),
        EvalErrorKind::IncompatibleType
    );
}

#[test]
fn eval_term_runs_quoted_code() {
    let quoted = quote(sum(int(1), int(2)));
    assert_eq!(eval_fresh(&call_named("evalTerm", vec![quoted])), Value::int(3));
}

#[test]
fn execute_term_runs_in_the_current_frame() {
    let mut interp = interpreter();
    let quoted = quote(assign(var("x"), int(5)));
    assert_eq!(
        eval(&mut interp, &call_named("executeTerm", vec![quoted])),
        Value::Undefined
    );
    assert_eq!(interp.lookup("x").unwrap(), Value::int(5));
}

// Files and input

#[test]
fn files_round_trip_through_the_io_handler() {
    let io = Rc::new(MemoryIoHandler::new().with_input(["hello"]));
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .io_handler(io.clone())
        .build();

    let written = eval(
        &mut interp,
        &call_named("writeFile", vec![string("out"), list(vec![int(1), string("a")])]),
    );
    assert_eq!(written, Value::Bool(true));
    eval(&mut interp, &call_named("appendFile", vec![string("out"), string("b")]));
    assert_eq!(io.file("out").unwrap(), "1\na\nb\n");
    assert_eq!(
        eval(&mut interp, &call_named("readFile", vec![string("out")])),
        Value::list(vec![Value::string("1"), Value::string("a"), Value::string("b")])
    );

    assert_eq!(eval(&mut interp, &call_named("get", vec![])), Value::string("hello"));
    assert_eq!(eval(&mut interp, &call_named("get", vec![])), Value::Undefined);
}

#[test]
fn file_paths_must_be_strings() {
    assert_eq!(
        error_kind(&call_named("writeFile", vec![int(1), string("x")])),
        EvalErrorKind::IncompatibleType
    );
}
