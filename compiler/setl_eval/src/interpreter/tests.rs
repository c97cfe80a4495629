#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::rc::Rc;

use pretty_assertions::assert_eq;
use setl_ir::build::*;
use setl_ir::{Block, CollectionBuilder, Expr, ExprKind, UnaryOp};
use setl_patterns::{EvalErrorKind, Value};

use super::*;
use crate::print_handler::buffer_handler;

fn buffered(flags: ExecutionFlags) -> Interpreter {
    Interpreter::builder()
        .print_handler(buffer_handler())
        .flags(flags)
        .build()
}

fn run(interp: &mut Interpreter, program: &Block) -> Result<(), EvalError> {
    interp.execute_program(program)
}

#[test]
fn builder_defaults() {
    let interp = Interpreter::builder().build();
    assert_eq!(interp.flags(), ExecutionFlags::empty());
    assert_eq!(interp.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
    assert_eq!(interp.call_depth, 0);
    assert!(!interp.term_converter().is_empty());
}

#[test]
fn verbose_results_print_top_level_expressions_only() {
    let mut interp = buffered(ExecutionFlags::VERBOSE_RESULTS);
    let program = block(vec![
        stmt(sum(int(1), int(2))),
        if_then(vec![(Some(boolean(true)), block(vec![stmt(int(9))]))]),
    ]);
    run(&mut interp, &program).unwrap();
    assert_eq!(interp.get_print_output(), "// Result: 3\n");
}

#[test]
fn traced_assignments() {
    let mut interp = buffered(ExecutionFlags::TRACE_ASSIGNMENTS);
    let program = block(vec![
        stmt(assign(var("x"), list(vec![int(1), int(2)]))),
        stmt(assign(access(var("x"), int(1)), int(5))),
    ]);
    run(&mut interp, &program).unwrap();
    assert_eq!(
        interp.get_print_output(),
        "~< Trace: x := [1, 2] >~\n~< Trace: x := [5, 2] >~\n"
    );
}

#[test]
fn flags_can_change_between_runs() {
    let mut interp = buffered(ExecutionFlags::empty());
    run(&mut interp, &block(vec![stmt(int(1))])).unwrap();
    interp.set_flags(ExecutionFlags::VERBOSE_RESULTS);
    run(&mut interp, &block(vec![stmt(int(2))])).unwrap();
    assert_eq!(interp.get_print_output(), "// Result: 2\n");
}

#[test]
fn escaped_signals_become_runtime_errors() {
    for signal in [brk(), cont(), ret(None), backtrack()] {
        let mut interp = buffered(ExecutionFlags::empty());
        let err = run(&mut interp, &block(vec![signal])).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::Runtime);
    }
}

#[test]
fn deep_recursion_hits_the_call_limit() {
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .max_call_depth(50)
        .build();
    let body = block(vec![ret(Some(call_named("f", vec![sum(var("n"), int(1))])))]);
    let program = block(vec![
        stmt(assign(var("f"), procedure(vec![param("n")], body))),
        stmt(call_named("f", vec![int(0)])),
    ]);
    let err = run(&mut interp, &program).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::RecursionLimit);
    assert_eq!(interp.call_depth, 0);
}

#[test]
fn globals_are_visible_to_programs() {
    let mut interp = buffered(ExecutionFlags::empty());
    interp.define_global("argv", Value::list(vec![Value::string("a")]));
    run(
        &mut interp,
        &block(vec![stmt(assign(var("n"), unary(UnaryOp::Cardinality, var("argv"))))]),
    )
    .unwrap();
    assert_eq!(interp.lookup("n").unwrap(), Value::int(1));
}

#[test]
fn reads_before_writes_are_reported() {
    let interp = buffered(ExecutionFlags::empty());
    let program = block(vec![
        stmt(assign(var("x"), sum(var("y"), int(1)))),
        stmt(call_named("print", vec![var("x")])),
    ]);
    let names: Vec<String> = interp
        .undefined_variable_warnings(&program)
        .iter()
        .map(|name| name.as_str().to_owned())
        .collect();
    assert_eq!(names, vec!["y".to_owned()]);
}

fn elements(literal: &Expr) -> &Rc<[Expr]> {
    match &literal.kind {
        ExprKind::List(CollectionBuilder::Explicit { elements })
        | ExprKind::Set(CollectionBuilder::Explicit { elements }) => elements,
        other => panic!("not an explicit literal: {other:?}"),
    }
}

#[test]
fn constant_literals_are_remembered_by_the_interpreter() {
    let mut interp = buffered(ExecutionFlags::empty());
    let constant = list(vec![int(1), sum(int(2), int(3))]);
    let first = interp.eval(&constant).unwrap();
    assert_eq!(interp.constants.get(elements(&constant)), Some(&Some(first.clone())));

    let shared = constant.clone();
    assert_eq!(interp.eval(&shared).unwrap(), first);

    let dynamic = set(vec![assign(var("y"), int(5))]);
    interp.eval(&dynamic).unwrap();
    assert_eq!(interp.constants.get(elements(&dynamic)), Some(&None));
    interp.define_global("y", Value::int(0));
    interp.eval(&dynamic).unwrap();
    assert_eq!(interp.lookup("y").unwrap(), Value::int(5));
}
