//! Programs rebuilt from their terms behave like the originals.
//!
//! Every program of the battery is converted to a term, reconstructed
//! through the term registry and run next to the original; printed output
//! and the final value of every variable must agree.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use setl_eval::{buffer_handler, Interpreter, Value};
use setl_ir::build::*;
use setl_ir::{AssignOp, BinaryOp, Block, Expr, Stmt, UnaryOp};
use setl_patterns::{block_to_term, TermConverter};

fn print(args: Vec<Expr>) -> Stmt {
    stmt(call_named("print", args))
}

fn ints(items: &[i64]) -> Vec<Expr> {
    items.iter().copied().map(int).collect()
}

/// Output and final values of `names` after running `program`.
fn observe(program: &Block, names: &[&str]) -> (String, Vec<Option<Value>>) {
    let mut interp = Interpreter::builder()
        .print_handler(buffer_handler())
        .seed(42)
        .build();
    interp.execute_program(program).unwrap();
    let values = names.iter().map(|name| interp.lookup(name)).collect();
    (interp.get_print_output(), values)
}

fn assert_round_trip(program: &Block, names: &[&str]) {
    let term = block_to_term(program);
    let rebuilt = TermConverter::new().term_to_block(&term).unwrap();
    assert_eq!(block_to_term(&rebuilt), term);
    let original = observe(program, names);
    assert!(!original.0.is_empty(), "battery programs must print something");
    assert_eq!(observe(&rebuilt, names), original);
}

#[test]
fn arithmetic_and_comparison_operators() {
    let numeric = [
        BinaryOp::Sum,
        BinaryOp::Difference,
        BinaryOp::Product,
        BinaryOp::Quotient,
        BinaryOp::IntegerDivision,
        BinaryOp::Modulo,
        BinaryOp::Power,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
        BinaryOp::LessThan,
        BinaryOp::LessOrEqual,
        BinaryOp::GreaterThan,
        BinaryOp::GreaterOrEqual,
    ];
    let mut stmts: Vec<Stmt> = numeric
        .into_iter()
        .map(|op| print(vec![binary(op, int(7), int(3))]))
        .collect();
    stmts.push(print(vec![binary(BinaryOp::Quotient, float(1.5), int(2))]));
    assert_round_trip(&block(stmts), &[]);
}

#[test]
fn boolean_and_membership_operators() {
    let logical = [
        BinaryOp::Conjunction,
        BinaryOp::Disjunction,
        BinaryOp::Implication,
        BinaryOp::Equivalence,
        BinaryOp::Antivalence,
    ];
    let mut stmts: Vec<Stmt> = logical
        .into_iter()
        .map(|op| print(vec![binary(op, boolean(true), boolean(false))]))
        .collect();
    stmts.push(print(vec![binary(BinaryOp::In, int(2), list(ints(&[1, 2])))]));
    stmts.push(print(vec![binary(BinaryOp::NotIn, int(2), set(ints(&[1, 2])))]));
    assert_round_trip(&block(stmts), &[]);
}

#[test]
fn unary_operators() {
    let program = block(vec![
        print(vec![unary(UnaryOp::Minus, int(3))]),
        print(vec![unary(UnaryOp::Not, boolean(true))]),
        print(vec![unary(UnaryOp::Cardinality, list(ints(&[1, 2])))]),
        print(vec![unary(UnaryOp::Factorial, int(5))]),
        print(vec![unary(UnaryOp::SumMembers, list(ints(&[1, 2, 3])))]),
        print(vec![unary(UnaryOp::ProductMembers, set(ints(&[2, 3, 4])))]),
    ]);
    assert_round_trip(&program, &[]);
}

#[test]
fn assignments_and_collections() {
    let mut stmts = vec![
        stmt(assign(var("xs"), list(ints(&[1, 2, 3, 4])))),
        stmt(assign(list(vec![var("a"), ignore()]), list(ints(&[5, 6])))),
        stmt(assign(var("m"), set(vec![list(vec![int(1), string("one")])]))),
        stmt(assign(access(var("m"), int(2)), string("two"))),
        stmt(assign(var("r"), stepped_range_list(int(1), int(3), int(9)))),
        stmt(assign(var("s"), range_set(int(1), int(3)))),
        stmt(assign(
            var("sq"),
            list_comprehension(
                product(var("x"), var("x")),
                vec![iter(var("x"), var("xs"))],
                Some(greater(var("x"), int(1))),
            ),
        )),
        stmt(assign(var("slice"), access_range(var("xs"), Some(int(2)), None))),
        stmt(assign(var("images"), collect_map(var("m"), int(1)))),
        stmt(assign(var("name"), access(var("m"), int(2)))),
    ];
    for op in AssignOp::ALL {
        stmts.push(stmt(compound(op, var("a"), int(2))));
    }
    stmts.push(print(vec![var("xs"), var("a"), var("m"), var("sq")]));
    let names = ["xs", "a", "m", "r", "s", "sq", "slice", "images", "name"];
    assert_round_trip(&block(stmts), &names);
}

#[test]
fn branches_and_loops() {
    let program = block(vec![
        stmt(assign(var("total"), int(0))),
        for_loop(
            vec![iter(var("i"), range_list(int(1), int(10)))],
            Some(equal(binary(BinaryOp::Modulo, var("i"), int(2)), int(1))),
            block(vec![
                if_then(vec![(Some(greater(var("i"), int(7))), block(vec![brk()]))]),
                stmt(compound(AssignOp::Sum, var("total"), var("i"))),
            ]),
        ),
        stmt(assign(var("n"), int(0))),
        while_loop(
            boolean(true),
            block(vec![
                stmt(compound(AssignOp::Sum, var("n"), int(1))),
                if_then(vec![
                    (Some(less(var("n"), int(3))), block(vec![cont()])),
                    (None, block(vec![brk()])),
                ]),
            ]),
        ),
        do_while(
            block(vec![stmt(compound(AssignOp::Difference, var("n"), int(1)))]),
            greater(var("n"), int(0)),
        ),
        switch(vec![
            (Some(equal(var("total"), int(0))), block(vec![print(vec![string("none")])])),
            (None, block(vec![print(vec![string("total "), var("total")])])),
        ]),
    ]);
    assert_round_trip(&program, &["total", "n"]);
}

#[test]
fn procedures_closures_and_lambdas() {
    let program = block(vec![
        stmt(assign(
            var("fact"),
            procedure(
                vec![param("n")],
                block(vec![
                    if_then(vec![(Some(less(var("n"), int(2))), block(vec![ret(Some(int(1)))]))]),
                    ret(Some(product(
                        var("n"),
                        call_named("fact", vec![difference(var("n"), int(1))]),
                    ))),
                ]),
            ),
        )),
        stmt(assign(
            var("swap"),
            procedure(
                vec![rw_param("a"), rw_param("b")],
                block(vec![stmt(assign(
                    list(vec![var("a"), var("b")]),
                    list(vec![var("b"), var("a")]),
                ))]),
            ),
        )),
        stmt(assign(var("k"), int(10))),
        stmt(assign(
            var("addK"),
            closure(vec![param("x")], block(vec![ret(Some(sum(var("x"), var("k"))))])),
        )),
        stmt(assign(var("twice"), lambda(&["x"], product(var("x"), int(2))))),
        stmt(assign(
            var("word"),
            procedure(vec![], block(vec![ret(Some(string("nil")))])),
        )),
        stmt(assign(var("r"), call_named("word", vec![]))),
        stmt(assign(var("p"), int(1))),
        stmt(assign(var("q"), int(2))),
        stmt(call_named("swap", vec![var("p"), var("q")])),
        print(vec![
            call_named("fact", ints(&[6])),
            string(" "),
            call_named("addK", ints(&[1])),
            string(" "),
            call_named("twice", ints(&[4])),
            string(" "),
            var("r"),
        ]),
    ]);
    assert_round_trip(&program, &["p", "q", "r"]);
}

#[test]
fn errors_backtracking_and_quantifiers() {
    let program = block(vec![
        try_catch(
            block(vec![throw(string("boom"))]),
            "e",
            block(vec![print(vec![string("caught "), var("e")])]),
        ),
        check(
            block(vec![print(vec![string("before")]), backtrack()]),
            Some(block(vec![print(vec![string("after backtrack")])])),
        ),
        stmt(assign(
            var("found"),
            exists(vec![iter(var("w"), set(ints(&[3, 4, 5])))], greater(var("w"), int(3))),
        )),
        stmt(assign(
            var("all"),
            forall(vec![iter(var("v"), list(ints(&[3, 4])))], greater(var("v"), int(3))),
        )),
        print(vec![var("found"), string(" "), var("w"), string(" "), var("all")]),
    ]);
    assert_round_trip(&program, &["found", "w", "all"]);
}

#[test]
fn match_statements() {
    let program = block(vec![
        stmt(assign(var("t"), term("node", vec![int(1), list(ints(&[2, 3]))]))),
        match_stmt(
            var("t"),
            vec![
                case(
                    vec![term("leaf", vec![var("x")])],
                    None,
                    block(vec![print(vec![string("leaf")])]),
                ),
                case(
                    vec![term("node", vec![var("x"), var("kids")])],
                    Some(greater(var("x"), int(0))),
                    block(vec![print(vec![string("node "), var("x"), var("kids")])]),
                ),
                default_case(block(vec![print(vec![string("other")])])),
            ],
        ),
        match_stmt(
            list(ints(&[7, 8, 9])),
            vec![split_case(
                vec![var("h")],
                var("rest"),
                None,
                block(vec![print(vec![var("h"), var("rest")])]),
            )],
        ),
    ]);
    assert_round_trip(&program, &[]);
}

#[test]
fn classes_and_quoted_terms() {
    let counter = class(
        vec![param("start")],
        block(vec![
            stmt(assign(var("count"), var("start"))),
            stmt(assign(
                var("bump"),
                procedure(
                    vec![],
                    block(vec![stmt(compound(
                        AssignOp::Sum,
                        member(var("this"), "count"),
                        int(1),
                    ))]),
                ),
            )),
        ]),
    );
    let program = block(vec![
        stmt(assign(var("Counter"), counter)),
        stmt(assign(var("c"), call_named("Counter", ints(&[5])))),
        stmt(call(member(var("c"), "bump"), vec![])),
        stmt(assign(var("n"), member(var("c"), "count"))),
        stmt(assign(var("q"), quote(call_named("f", vec![sum(int(1), int(2))])))),
        stmt(assign(var("u"), term("F", vec![var("n")]))),
        print(vec![var("n"), string(" "), var("q"), string(" "), var("u")]),
    ]);
    assert_round_trip(&program, &["n", "q", "u"]);
}
