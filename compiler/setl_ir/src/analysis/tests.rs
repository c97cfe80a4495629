use super::*;
use crate::build::*;
use crate::AssignOp;
use pretty_assertions::assert_eq;

fn names(v: &[Name]) -> Vec<&str> {
    v.iter().map(Name::as_str).collect()
}

fn free(vars: &VariableSets) -> Vec<&str> {
    vars.free_variables().map(Name::as_str).collect()
}

fn analyse(stmts: Vec<Stmt>) -> VariableSets {
    let mut vars = VariableSets::new();
    block(stmts).collect_variables(&mut vars);
    vars
}

#[test]
fn write_then_read_is_bound_and_used() {
    let vars = analyse(vec![
        stmt(assign(var("x"), int(1))),
        stmt(sum(var("x"), var("y"))),
    ]);
    assert_eq!(names(&vars.bound), ["x"]);
    assert_eq!(free(&vars), ["y"]);
    assert_eq!(names(&vars.used), ["x"]);
}

#[test]
fn right_hand_side_is_read_before_target_is_bound() {
    let vars = analyse(vec![stmt(assign(var("x"), sum(var("x"), int(1))))]);
    assert_eq!(free(&vars), ["x"]);
    assert_eq!(names(&vars.bound), ["x"]);
}

#[test]
fn if_without_else_binds_nothing() {
    let vars = analyse(vec![if_then(vec![(
        Some(var("c")),
        block(vec![stmt(assign(var("x"), int(1)))]),
    )])]);
    assert!(vars.bound.is_empty());
}

#[test]
fn if_with_else_binds_common_variables() {
    let vars = analyse(vec![if_then(vec![
        (
            Some(var("c")),
            block(vec![
                stmt(assign(var("x"), int(1))),
                stmt(assign(var("y"), int(1))),
            ]),
        ),
        (None, block(vec![stmt(assign(var("x"), int(2)))])),
    ])]);
    assert_eq!(names(&vars.bound), ["x"]);
}

#[test]
fn switch_needs_default() {
    let branches = |with_default: bool| {
        let mut b = vec![(Some(var("c")), block(vec![stmt(assign(var("x"), int(1)))]))];
        if with_default {
            b.push((None, block(vec![stmt(assign(var("x"), int(2)))])));
        }
        switch(b)
    };
    assert!(analyse(vec![branches(false)]).bound.is_empty());
    assert_eq!(names(&analyse(vec![branches(true)]).bound), ["x"]);
}

#[test]
fn loop_bindings_are_rolled_back() {
    let vars = analyse(vec![for_loop(
        vec![iter(var("i"), var("s"))],
        None,
        block(vec![stmt(assign(var("t"), var("i")))]),
    )]);
    assert!(vars.bound.is_empty());
    assert_eq!(free(&vars), ["s"]);
    assert_eq!(names(&vars.used), ["i"]);

    let vars = analyse(vec![while_loop(
        var("c"),
        block(vec![stmt(assign(var("t"), int(1)))]),
    )]);
    assert!(vars.bound.is_empty());
}

#[test]
fn check_recovery_bindings_are_rolled_back() {
    let vars = analyse(vec![check(
        block(vec![stmt(assign(var("a"), int(1)))]),
        Some(block(vec![stmt(assign(var("b"), int(1)))])),
    )]);
    assert_eq!(names(&vars.bound), ["a"]);
}

#[test]
fn exists_prevents_optimization() {
    let e = exists(vec![iter(var("x"), set(vec![int(1)]))], greater(var("x"), int(0)));
    let mut vars = VariableSets::new();
    e.collect_variables(&mut vars);
    assert!(vars.bound.is_empty());
    assert_eq!(vars.unbound, vec![Name::prevent_optimization()]);
    assert!(!e.is_constant());
}

#[test]
fn constant_literals() {
    assert!(list(vec![int(1), sum(int(2), int(3))]).is_constant());
    assert!(!list(vec![var("x")]).is_constant());
    assert!(!list(vec![call_named("f", vec![])]).is_constant());
    assert!(list_comprehension(var("x"), vec![iter(var("x"), list(vec![int(1)]))], None).is_constant());
}

#[test]
fn assignments_prevent_optimization() {
    assert!(!list(vec![assign(var("y"), int(5))]).is_constant());
    assert!(!set(vec![compound(AssignOp::Sum, var("y"), int(1))]).is_constant());
    let nested = list_comprehension(
        assign(var("y"), var("x")),
        vec![iter(var("x"), list(vec![int(1)]))],
        None,
    );
    assert!(!nested.is_constant());

    let vars = analyse(vec![stmt(assign(var("x"), int(1)))]);
    assert!(vars.unbound.contains(&Name::prevent_optimization()));
    assert!(free(&vars).is_empty());
}

#[test]
fn match_pattern_variables_are_temporary() {
    let vars = analyse(vec![match_stmt(
        var("t"),
        vec![
            case(
                vec![term("F", vec![var("a")])],
                Some(greater(var("a"), int(0))),
                block(vec![stmt(assign(var("r"), var("a")))]),
            ),
            default_case(block(vec![stmt(assign(var("r"), int(0)))])),
        ],
    )]);
    assert_eq!(names(&vars.bound), ["r"]);
    assert_eq!(free(&vars), ["t"]);
    assert_eq!(names(&vars.used), ["a"]);
}

#[test]
fn closure_free_variables_are_read_outside() {
    let c = closure(vec![param("x")], block(vec![ret(Some(sum(var("x"), var("k"))))]));
    let mut vars = VariableSets::new();
    c.collect_variables(&mut vars);
    let free: Vec<&str> = vars.free_variables().map(Name::as_str).collect();
    assert_eq!(free, ["k"]);

    let p = procedure(vec![], block(vec![ret(Some(var("k")))]));
    let mut vars = VariableSets::new();
    p.collect_variables(&mut vars);
    assert!(vars.unbound.is_empty());
}

#[test]
fn unbound_variables_of_block() {
    let b = block(vec![
        stmt(assign(var("a"), var("b"))),
        stmt(call_named("print", vec![var("a"), var("c")])),
    ]);
    let unbound: Vec<String> = b.unbound_variables().iter().map(ToString::to_string).collect();
    assert_eq!(unbound, ["b", "print", "c"]);
}
