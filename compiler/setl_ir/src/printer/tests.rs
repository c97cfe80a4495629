use super::{class_to_string, procedure_to_string};
use crate::ast::ExprKind;
use crate::ast::{BinaryOp, UnaryOp};
use crate::build::*;
use pretty_assertions::assert_eq;

#[test]
fn minimal_parentheses_for_arithmetic() {
    let e = product(sum(var("a"), var("b")), var("c"));
    assert_eq!(e.to_string(), "(a + b) * c");

    let e = sum(var("a"), product(var("b"), var("c")));
    assert_eq!(e.to_string(), "a + b * c");

    let e = difference(var("a"), difference(var("b"), var("c")));
    assert_eq!(e.to_string(), "a - (b - c)");

    let e = difference(difference(var("a"), var("b")), var("c"));
    assert_eq!(e.to_string(), "a - b - c");
}

#[test]
fn power_is_right_associative() {
    let e = binary(BinaryOp::Power, var("a"), binary(BinaryOp::Power, var("b"), var("c")));
    assert_eq!(e.to_string(), "a ** b ** c");
    let e = binary(BinaryOp::Power, binary(BinaryOp::Power, var("a"), var("b")), var("c"));
    assert_eq!(e.to_string(), "(a ** b) ** c");
}

#[test]
fn unary_operators() {
    assert_eq!(unary(UnaryOp::Minus, sum(var("a"), int(1))).to_string(), "-(a + 1)");
    assert_eq!(unary(UnaryOp::Factorial, var("n")).to_string(), "n!");
    assert_eq!(unary(UnaryOp::Cardinality, var("s")).to_string(), "#s");
    assert_eq!(unary(UnaryOp::SumMembers, var("s")).to_string(), "+/ s");
    assert_eq!(
        unary(UnaryOp::Not, equal(var("a"), var("b"))).to_string(),
        "!a == b"
    );
}

#[test]
fn literals() {
    assert_eq!(string("a\"b").to_string(), "\"a\\\"b\"");
    assert_eq!(float(1.0).to_string(), "1.0");
    assert_eq!(om().to_string(), "om");
    assert_eq!(boolean(true).to_string(), "true");
    assert_eq!(int(-3).to_string(), "-3");
}

#[test]
fn collections_and_access() {
    assert_eq!(list(vec![int(1), var("x")]).to_string(), "[1, x]");
    assert_eq!(set(vec![]).to_string(), "{}");
    assert_eq!(range_list(int(1), var("n")).to_string(), "[1..n]");
    assert_eq!(
        stepped_range_list(int(1), int(3), int(9)).to_string(),
        "[1, 3..9]"
    );
    let comp = set_comprehension(
        product(var("x"), int(2)),
        vec![iter(var("x"), var("s"))],
        Some(greater(var("x"), int(0))),
    );
    assert_eq!(comp.to_string(), "{x * 2 : x in s | x > 0}");
    assert_eq!(access(var("l"), int(1)).to_string(), "l[1]");
    assert_eq!(access_range(var("l"), Some(int(2)), None).to_string(), "l[2..]");
    assert_eq!(collect_map(var("f"), int(1)).to_string(), "f{1}");
    assert_eq!(member(var("o"), "x").to_string(), "o.x");
}

#[test]
fn quantifiers_and_terms() {
    let e = exists(vec![iter(var("x"), var("s"))], greater(var("x"), int(1)));
    assert_eq!(e.to_string(), "exists (x in s | x > 1)");
    assert_eq!(term("F", vec![var("x"), int(1)]).to_string(), "F(x, 1)");
    assert_eq!(term("f", vec![]).to_string(), "@f()");
    assert_eq!(quote(var("x")).to_string(), "@(x)");
}

#[test]
fn lambdas_and_procedures() {
    assert_eq!(lambda(&["x"], product(var("x"), var("x"))).to_string(), "x |-> x * x");
    assert_eq!(
        lambda(&["x", "y"], sum(var("x"), var("y"))).to_string(),
        "[x, y] |-> x + y"
    );
    let p = procedure(
        vec![param("a"), rw_param("b")],
        block(vec![ret(Some(var("a")))]),
    );
    assert_eq!(p.to_string(), "procedure(a, rw b) {\n    return a;\n}");
}

#[test]
fn assignment_target_and_value() {
    let e = assign(var("x"), assign(var("y"), int(1)));
    assert_eq!(e.to_string(), "x := y := 1");
}

#[test]
fn statements_indent_nested_blocks() {
    let s = if_then(vec![
        (
            Some(less(var("x"), int(0))),
            block(vec![stmt(assign(var("y"), int(1)))]),
        ),
        (None, block(vec![brk()])),
    ]);
    assert_eq!(
        s.to_string(),
        "if (x < 0) {\n    y := 1;\n} else {\n    break;\n}"
    );
}

#[test]
fn check_and_match() {
    let s = check(block(vec![backtrack()]), Some(block(vec![])));
    assert_eq!(s.to_string(), "check {\n    backtrack;\n} afterBacktrack {\n}");

    let m = match_stmt(
        var("t"),
        vec![
            case(vec![term("F", vec![var("x")])], Some(greater(var("x"), int(0))), block(vec![stmt(var("x"))])),
            split_case(vec![var("h")], var("r"), None, block(vec![])),
            default_case(block(vec![cont()])),
        ],
    );
    assert_eq!(
        m.to_string(),
        "match (t) {\n    case F(x) | x > 0:\n        x;\n    case [h | r]:\n    default:\n        continue;\n}"
    );
}

#[test]
fn definitions_print_without_an_expression() {
    let ExprKind::Procedure(def) = closure(vec![param("n")], block(vec![ret(None)])).kind else {
        panic!("expected a closure");
    };
    assert_eq!(procedure_to_string(&def), "closure(n) {\n    return;\n}");

    let ExprKind::Class(def) = class(vec![param("x")], block(vec![])).kind else {
        panic!("expected a class");
    };
    assert_eq!(class_to_string(&def), "class (x) {\n}");
}
