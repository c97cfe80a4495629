//! Helpers for building code trees in Rust.
//!
//! The evaluator never parses source text; hosts and tests assemble trees
//! with these functions instead:
//!
//! ```text
//! use setl_ir::build::*;
//! let prog = block(vec![
//!     stmt(assign(var("x"), int(1))),
//!     for_loop(vec![iter(var("i"), range_list(int(1), int(3)))], None,
//!              block(vec![stmt(compound(AssignOp::Sum, var("x"), var("i")))])),
//! ]);
//! ```

use std::rc::Rc;

use num_bigint::BigInt;

use crate::ast::{
    AssignOp, BinaryOp, Block, ClassDef, CollectionBuilder, Expr, ExprKind, IfThenBranch,
    IterBinding, Literal, MatchBranch, Param, ProcedureDef, ProcedureKind, Stmt, StmtKind,
    SwitchBranch, UnaryOp,
};
use crate::Name;

// Expressions

pub fn var(name: &str) -> Expr {
    Expr::synthetic(ExprKind::Variable(Name::new(name)))
}

pub fn ignore() -> Expr {
    Expr::synthetic(ExprKind::Ignore)
}

pub fn om() -> Expr {
    Expr::synthetic(ExprKind::Literal(Literal::Om))
}

pub fn boolean(b: bool) -> Expr {
    Expr::synthetic(ExprKind::Literal(Literal::Bool(b)))
}

pub fn int(i: i64) -> Expr {
    Expr::synthetic(ExprKind::Literal(Literal::Integer(BigInt::from(i))))
}

pub fn big(i: BigInt) -> Expr {
    Expr::synthetic(ExprKind::Literal(Literal::Integer(i)))
}

pub fn float(f: f64) -> Expr {
    Expr::synthetic(ExprKind::Literal(Literal::Float(f)))
}

pub fn string(s: &str) -> Expr {
    Expr::synthetic(ExprKind::Literal(Literal::Str(s.to_string())))
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::synthetic(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn sum(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Sum, left, right)
}

pub fn difference(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Difference, left, right)
}

pub fn product(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Product, left, right)
}

pub fn equal(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Equal, left, right)
}

pub fn less(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::LessThan, left, right)
}

pub fn greater(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::GreaterThan, left, right)
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::synthetic(ExprKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn assign(target: Expr, value: Expr) -> Expr {
    Expr::synthetic(ExprKind::Assign {
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn compound(op: AssignOp, target: Expr, value: Expr) -> Expr {
    Expr::synthetic(ExprKind::CompoundAssign {
        op,
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::synthetic(ExprKind::Call {
        callee: Box::new(callee),
        args,
    })
}

/// Call of the procedure stored in variable `name`.
pub fn call_named(name: &str, args: Vec<Expr>) -> Expr {
    call(var(name), args)
}

pub fn access(target: Expr, index: Expr) -> Expr {
    Expr::synthetic(ExprKind::CollectionAccess {
        target: Box::new(target),
        args: vec![index],
    })
}

pub fn access_range(target: Expr, low: Option<Expr>, high: Option<Expr>) -> Expr {
    Expr::synthetic(ExprKind::AccessRange {
        target: Box::new(target),
        low: low.map(Box::new),
        high: high.map(Box::new),
    })
}

pub fn collect_map(target: Expr, arg: Expr) -> Expr {
    Expr::synthetic(ExprKind::CollectMap {
        target: Box::new(target),
        arg: Box::new(arg),
    })
}

pub fn member(target: Expr, name: &str) -> Expr {
    Expr::synthetic(ExprKind::MemberAccess {
        target: Box::new(target),
        member: Name::new(name),
    })
}

pub fn list(elements: Vec<Expr>) -> Expr {
    Expr::synthetic(ExprKind::List(CollectionBuilder::explicit(elements)))
}

pub fn set(elements: Vec<Expr>) -> Expr {
    Expr::synthetic(ExprKind::Set(CollectionBuilder::explicit(elements)))
}

fn range(first: Expr, second: Option<Expr>, last: Expr) -> CollectionBuilder {
    CollectionBuilder::Range {
        first: Box::new(first),
        second: second.map(Box::new),
        last: Box::new(last),
    }
}

/// `[first..last]`
pub fn range_list(first: Expr, last: Expr) -> Expr {
    Expr::synthetic(ExprKind::List(range(first, None, last)))
}

/// `[first, second..last]`
pub fn stepped_range_list(first: Expr, second: Expr, last: Expr) -> Expr {
    Expr::synthetic(ExprKind::List(range(first, Some(second), last)))
}

/// `{first..last}`
pub fn range_set(first: Expr, last: Expr) -> Expr {
    Expr::synthetic(ExprKind::Set(range(first, None, last)))
}

fn iteration(element: Expr, iterators: Vec<IterBinding>, condition: Option<Expr>) -> CollectionBuilder {
    CollectionBuilder::Iteration {
        element: Box::new(element),
        iterators,
        condition: condition.map(Box::new),
    }
}

/// `[element : iterators | condition]`
pub fn list_comprehension(element: Expr, iterators: Vec<IterBinding>, condition: Option<Expr>) -> Expr {
    Expr::synthetic(ExprKind::List(iteration(element, iterators, condition)))
}

/// `{element : iterators | condition}`
pub fn set_comprehension(element: Expr, iterators: Vec<IterBinding>, condition: Option<Expr>) -> Expr {
    Expr::synthetic(ExprKind::Set(iteration(element, iterators, condition)))
}

pub fn iter(target: Expr, collection: Expr) -> IterBinding {
    IterBinding { target, collection }
}

pub fn exists(iterators: Vec<IterBinding>, condition: Expr) -> Expr {
    Expr::synthetic(ExprKind::Exists {
        iterators,
        condition: Box::new(condition),
    })
}

pub fn forall(iterators: Vec<IterBinding>, condition: Expr) -> Expr {
    Expr::synthetic(ExprKind::Forall {
        iterators,
        condition: Box::new(condition),
    })
}

pub fn procedure(params: Vec<Param>, body: Block) -> Expr {
    Expr::synthetic(ExprKind::Procedure(Rc::new(ProcedureDef {
        kind: ProcedureKind::Procedure,
        params,
        body,
    })))
}

pub fn closure(params: Vec<Param>, body: Block) -> Expr {
    Expr::synthetic(ExprKind::Procedure(Rc::new(ProcedureDef {
        kind: ProcedureKind::Closure,
        params,
        body,
    })))
}

/// `p1, p2 |-> body`
pub fn lambda(params: &[&str], body: Expr) -> Expr {
    Expr::synthetic(ExprKind::Procedure(Rc::new(ProcedureDef {
        kind: ProcedureKind::Lambda,
        params: params.iter().map(|p| Param::read_only(*p)).collect(),
        body: Block::new(vec![ret(Some(body))]),
    })))
}

pub fn class(params: Vec<Param>, body: Block) -> Expr {
    Expr::synthetic(ExprKind::Class(Rc::new(ClassDef { params, body })))
}

pub fn param(name: &str) -> Param {
    Param::read_only(name)
}

pub fn rw_param(name: &str) -> Param {
    Param::read_write(name)
}

/// User term `fc(args)`.
pub fn term(fc: &str, args: Vec<Expr>) -> Expr {
    Expr::synthetic(ExprKind::Term {
        functional_character: Name::new(fc),
        args,
    })
}

pub fn quote(inner: Expr) -> Expr {
    Expr::synthetic(ExprKind::Quote(Box::new(inner)))
}

// Statements

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block::new(stmts)
}

pub fn stmt(expr: Expr) -> Stmt {
    Stmt::synthetic(StmtKind::Expr(expr))
}

/// `if (c1) {..} else if (c2) {..} else {..}`; `None` marks the else.
pub fn if_then(branches: Vec<(Option<Expr>, Block)>) -> Stmt {
    Stmt::synthetic(StmtKind::IfThen(
        branches
            .into_iter()
            .map(|(condition, body)| IfThenBranch { condition, body })
            .collect(),
    ))
}

pub fn switch(branches: Vec<(Option<Expr>, Block)>) -> Stmt {
    Stmt::synthetic(StmtKind::Switch(
        branches
            .into_iter()
            .map(|(condition, body)| SwitchBranch { condition, body })
            .collect(),
    ))
}

pub fn match_stmt(subject: Expr, branches: Vec<MatchBranch>) -> Stmt {
    Stmt::synthetic(StmtKind::Match { subject, branches })
}

pub fn case(patterns: Vec<Expr>, condition: Option<Expr>, body: Block) -> MatchBranch {
    MatchBranch::Case {
        patterns,
        condition,
        body,
    }
}

pub fn split_case(heads: Vec<Expr>, rest: Expr, condition: Option<Expr>, body: Block) -> MatchBranch {
    MatchBranch::SplitList {
        heads,
        rest: Box::new(rest),
        condition,
        body,
    }
}

pub fn default_case(body: Block) -> MatchBranch {
    MatchBranch::Default { body }
}

pub fn for_loop(iterators: Vec<IterBinding>, condition: Option<Expr>, body: Block) -> Stmt {
    Stmt::synthetic(StmtKind::For {
        iterators,
        condition,
        body,
    })
}

pub fn while_loop(condition: Expr, body: Block) -> Stmt {
    Stmt::synthetic(StmtKind::While { condition, body })
}

pub fn do_while(body: Block, condition: Expr) -> Stmt {
    Stmt::synthetic(StmtKind::DoWhile { body, condition })
}

pub fn ret(value: Option<Expr>) -> Stmt {
    Stmt::synthetic(StmtKind::Return(value))
}

pub fn brk() -> Stmt {
    Stmt::synthetic(StmtKind::Break)
}

pub fn cont() -> Stmt {
    Stmt::synthetic(StmtKind::Continue)
}

pub fn try_catch(body: Block, error_var: &str, recovery: Block) -> Stmt {
    Stmt::synthetic(StmtKind::TryCatch {
        body,
        error_var: Name::new(error_var),
        recovery,
    })
}

pub fn throw(value: Expr) -> Stmt {
    Stmt::synthetic(StmtKind::Throw(value))
}

pub fn check(body: Block, recovery: Option<Block>) -> Stmt {
    Stmt::synthetic(StmtKind::Check { body, recovery })
}

pub fn backtrack() -> Stmt {
    Stmt::synthetic(StmtKind::Backtrack)
}
