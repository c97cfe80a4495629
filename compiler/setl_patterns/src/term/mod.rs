//! Terms: the generic, printable and matchable form of values and code.
//!
//! Every code node converts to a term whose functional character is derived
//! from its [`NodeKind`]. The encoding conventions:
//!
//! - a missing optional child is `^nil()`, which no literal produces, so
//!   the string `"nil"` stays a string
//! - variables are `^variable("x")`, `_` is [`Value::Ignore`]
//! - literals are the values themselves, except `om` which is `^om()`
//! - explicit list and set literals are lists and sets of element terms;
//!   the elements of a set literal are therefore sorted and deduplicated,
//!   so `{g(), f()}` rebuilds as `{f(), g()}` and evaluates its calls in
//!   that order. Set patterns in `match` rely on this form.
//! - an expression statement is the term of its expression
//! - blocks are `^block([stmt, ...])`
//!
//! [`TermConverter`] turns terms back into code.

mod convert;
mod matching;

use std::convert::Infallible;

pub use convert::TermConverter;
pub use matching::{match_split_list, match_term, MatchResult};

use setl_ir::{
    Block, ClassDef, CollectionBuilder, Expr, ExprKind, IfThenBranch, IterBinding, Literal,
    MatchBranch, NodeKind, Param, ProcedureDef, ProcedureKind, Stmt, StmtKind, SwitchBranch,
};
use setl_stack::ensure_sufficient_stack;

use crate::matrix::Matrix;
use crate::value::Value;

/// Functional character of the marker for a missing optional child.
pub const NIL: &str = "^nil";

fn nil() -> Value {
    Value::term(NIL, Vec::new())
}

fn node(kind: NodeKind, args: Vec<Value>) -> Value {
    Value::term(kind.functional_character(), args)
}

/// `^variable("name")`
pub fn variable_term(name: &str) -> Value {
    node(NodeKind::Variable, vec![Value::string(name)])
}

/// Term form of a runtime value.
pub fn value_to_term(value: &Value) -> Value {
    ensure_sufficient_stack(|| match value {
        Value::Undefined => node(NodeKind::Om, Vec::new()),
        Value::Ignore
        | Value::Bool(_)
        | Value::Rational(_)
        | Value::Float(_)
        | Value::Str(_) => value.clone(),
        Value::List(items) => Value::list(items.iter().map(value_to_term).collect()),
        Value::Set(items) => Value::set(items.iter().map(value_to_term)),
        Value::Term(t) => Value::term(
            t.functional_character().clone(),
            t.args().iter().map(value_to_term).collect(),
        ),
        Value::Matrix(m) => Value::term(
            "^matrix",
            vec![Value::list(
                m.to_rows()
                    .into_iter()
                    .map(|row| Value::list(row.into_iter().map(Value::float).collect()))
                    .collect(),
            )],
        ),
        Value::Procedure(p) => procedure_to_term(&p.def),
        Value::Builtin(name) => variable_term(name.as_str()),
        Value::Class(def) => class_to_term(def),
        Value::Object(o) => Value::term(
            "^object",
            vec![Value::set(o.members().iter().map(|(name, v)| {
                Value::pair(Value::string(name.as_str()), value_to_term(v))
            }))],
        ),
        Value::Error(message) => Value::term("^error", vec![Value::string(&**message)]),
    })
}

/// Inverse of [`value_to_term`] for data: `^om()` becomes `om`, matrix and
/// error terms become their values, and everything else is rebuilt with
/// converted children.
pub fn term_to_value(term: &Value) -> Value {
    ensure_sufficient_stack(|| match term {
        Value::List(items) => Value::list(items.iter().map(term_to_value).collect()),
        Value::Set(items) => Value::set(items.iter().map(term_to_value)),
        Value::Term(t) => {
            let fc = t.functional_character().as_str();
            match (fc, t.args()) {
                ("^om", []) => Value::Undefined,
                ("^error", [Value::Str(message)]) => Value::error(message.as_str()),
                ("^matrix", [rows]) => matrix_from_term(rows).unwrap_or_else(|| term.clone()),
                (_, args) => Value::term(
                    t.functional_character().clone(),
                    args.iter().map(term_to_value).collect(),
                ),
            }
        }
        other => other.clone(),
    })
}

fn matrix_from_term(rows: &Value) -> Option<Value> {
    let rows = rows
        .as_list()?
        .iter()
        .map(|row| row.as_list()?.iter().map(Value::to_f64).collect::<Option<Vec<f64>>>())
        .collect::<Option<Vec<_>>>()?;
    Matrix::from_rows(&rows).ok().map(Value::Matrix)
}

/// Substitutes the term of a sub-expression, or declines with `None`.
pub type TermHook<'h, E> = dyn FnMut(&Expr) -> Option<Result<Value, E>> + 'h;

/// Term form of an expression.
pub fn expr_to_term(expr: &Expr) -> Value {
    match expr_to_term_with::<Infallible>(expr, &mut |_: &Expr| None) {
        Ok(term) => term,
        Err(never) => match never {},
    }
}

/// Term form of an expression where `hook` is asked first for every
/// sub-expression outside of nested procedure and class bodies.
pub fn expr_to_term_with<E>(expr: &Expr, hook: &mut TermHook<'_, E>) -> Result<Value, E> {
    ensure_sufficient_stack(|| {
        if let Some(term) = hook(expr) {
            return term;
        }
        Converter { hook }.expr(expr)
    })
}

struct Converter<'a, 'h, E> {
    hook: &'a mut TermHook<'h, E>,
}

impl<E> Converter<'_, '_, E> {
    fn child(&mut self, expr: &Expr) -> Result<Value, E> {
        expr_to_term_with(expr, self.hook)
    }

    fn optional(&mut self, expr: Option<&Expr>) -> Result<Value, E> {
        expr.map_or_else(|| Ok(nil()), |e| self.child(e))
    }

    fn list(&mut self, exprs: &[Expr]) -> Result<Value, E> {
        let items = exprs
            .iter()
            .map(|e| self.child(e))
            .collect::<Result<_, _>>()?;
        Ok(Value::list(items))
    }

    fn node(&mut self, kind: NodeKind, children: &[&Expr]) -> Result<Value, E> {
        let args = children
            .iter()
            .map(|e| self.child(e))
            .collect::<Result<_, _>>()?;
        Ok(node(kind, args))
    }

    fn expr(&mut self, expr: &Expr) -> Result<Value, E> {
        let term = match &expr.kind {
            ExprKind::Literal(lit) => literal_to_value(lit),
            ExprKind::Variable(name) => variable_term(name.as_str()),
            ExprKind::Ignore => Value::Ignore,
            ExprKind::Binary { op, left, right } => self.node(op.node_kind(), &[left, right])?,
            ExprKind::Unary { op, operand } => self.node(op.node_kind(), &[operand])?,
            ExprKind::Assign { target, value } => {
                self.node(NodeKind::Assignment, &[target, value])?
            }
            ExprKind::CompoundAssign { op, target, value } => {
                self.node(op.node_kind(), &[target, value])?
            }
            ExprKind::Call { callee, args } => {
                node(NodeKind::Call, vec![self.child(callee)?, self.list(args)?])
            }
            ExprKind::CollectionAccess { target, args } => node(
                NodeKind::CollectionAccess,
                vec![self.child(target)?, self.list(args)?],
            ),
            ExprKind::AccessRange { target, low, high } => node(
                NodeKind::AccessRange,
                vec![
                    self.child(target)?,
                    self.optional(low.as_deref())?,
                    self.optional(high.as_deref())?,
                ],
            ),
            ExprKind::CollectMap { target, arg } => self.node(NodeKind::CollectMap, &[target, arg])?,
            ExprKind::MemberAccess { target, member } => node(
                NodeKind::MemberAccess,
                vec![self.child(target)?, Value::string(member.as_str())],
            ),
            ExprKind::List(CollectionBuilder::Explicit { elements, .. }) => self.list(elements)?,
            ExprKind::Set(CollectionBuilder::Explicit { elements, .. }) => {
                let items = elements
                    .iter()
                    .map(|e| self.child(e))
                    .collect::<Result<Vec<_>, _>>()?;
                Value::set(items)
            }
            ExprKind::List(builder) => {
                node(NodeKind::ListConstructor, vec![self.builder(builder)?])
            }
            ExprKind::Set(builder) => node(NodeKind::SetConstructor, vec![self.builder(builder)?]),
            ExprKind::Exists {
                iterators,
                condition,
            } => node(
                NodeKind::Exists,
                vec![self.iterators(iterators)?, self.child(condition)?],
            ),
            ExprKind::Forall {
                iterators,
                condition,
            } => node(
                NodeKind::Forall,
                vec![self.iterators(iterators)?, self.child(condition)?],
            ),
            ExprKind::Procedure(def) => procedure_to_term(def),
            ExprKind::Class(def) => class_to_term(def),
            ExprKind::Term {
                functional_character,
                args,
            } => {
                let args = args
                    .iter()
                    .map(|e| self.child(e))
                    .collect::<Result<_, _>>()?;
                Value::term(functional_character.clone(), args)
            }
            ExprKind::Quote(inner) => self.node(NodeKind::Quote, &[inner])?,
        };
        Ok(term)
    }

    fn builder(&mut self, builder: &CollectionBuilder) -> Result<Value, E> {
        let term = match builder {
            CollectionBuilder::Explicit { elements, .. } => self.list(elements)?,
            CollectionBuilder::Range {
                first,
                second,
                last,
            } => node(
                NodeKind::Range,
                vec![
                    self.child(first)?,
                    self.optional(second.as_deref())?,
                    self.child(last)?,
                ],
            ),
            CollectionBuilder::Iteration {
                element,
                iterators,
                condition,
            } => node(
                NodeKind::Iteration,
                vec![
                    self.child(element)?,
                    self.iterators(iterators)?,
                    self.optional(condition.as_deref())?,
                ],
            ),
        };
        Ok(term)
    }

    fn iterators(&mut self, iterators: &[IterBinding]) -> Result<Value, E> {
        let items = iterators
            .iter()
            .map(|it| self.node(NodeKind::Iterator, &[&it.target, &it.collection]))
            .collect::<Result<_, _>>()?;
        Ok(Value::list(items))
    }
}

fn literal_to_value(lit: &Literal) -> Value {
    match lit {
        Literal::Om => node(NodeKind::Om, Vec::new()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Integer(i) => Value::integer(i.clone()),
        Literal::Float(f) => Value::float(*f),
        Literal::Str(s) => Value::string(s.as_str()),
    }
}

fn optional_expr(expr: Option<&Expr>) -> Value {
    expr.map_or_else(nil, expr_to_term)
}

fn exprs_to_list(exprs: &[Expr]) -> Value {
    Value::list(exprs.iter().map(expr_to_term).collect())
}

fn iterators_to_term(iterators: &[IterBinding]) -> Value {
    Value::list(
        iterators
            .iter()
            .map(|it| {
                node(
                    NodeKind::Iterator,
                    vec![expr_to_term(&it.target), expr_to_term(&it.collection)],
                )
            })
            .collect(),
    )
}

fn params_to_term(params: &[Param]) -> Value {
    Value::list(
        params
            .iter()
            .map(|p| {
                let kind = if p.is_read_write() {
                    NodeKind::RwParameter
                } else {
                    NodeKind::Parameter
                };
                node(kind, vec![Value::string(p.name.as_str())])
            })
            .collect(),
    )
}

/// Term form of a procedure, closure or lambda definition.
pub fn procedure_to_term(def: &ProcedureDef) -> Value {
    if def.kind == ProcedureKind::Lambda {
        if let Some(body) = def.lambda_body() {
            return node(
                NodeKind::LambdaProcedure,
                vec![params_to_term(&def.params), expr_to_term(body)],
            );
        }
    }
    node(
        def.kind.node_kind(),
        vec![params_to_term(&def.params), block_to_term(&def.body)],
    )
}

fn class_to_term(def: &ClassDef) -> Value {
    node(
        NodeKind::Class,
        vec![params_to_term(&def.params), block_to_term(&def.body)],
    )
}

/// `^block([stmt, ...])`
pub fn block_to_term(block: &Block) -> Value {
    node(
        NodeKind::Block,
        vec![Value::list(block.stmts.iter().map(stmt_to_term).collect())],
    )
}

fn optional_block(block: Option<&Block>) -> Value {
    block.map_or_else(nil, block_to_term)
}

/// Term form of a statement.
pub fn stmt_to_term(stmt: &Stmt) -> Value {
    ensure_sufficient_stack(|| stmt_to_term_inner(stmt))
}

fn stmt_to_term_inner(stmt: &Stmt) -> Value {
    match &stmt.kind {
        StmtKind::Expr(expr) => expr_to_term(expr),
        StmtKind::IfThen(branches) => node(
            NodeKind::IfThen,
            vec![Value::list(
                branches
                    .iter()
                    .enumerate()
                    .map(|(i, b)| if_branch_to_term(i, b))
                    .collect(),
            )],
        ),
        StmtKind::Switch(branches) => node(
            NodeKind::Switch,
            vec![Value::list(branches.iter().map(switch_branch_to_term).collect())],
        ),
        StmtKind::Match { subject, branches } => node(
            NodeKind::Match,
            vec![
                expr_to_term(subject),
                Value::list(branches.iter().map(match_branch_to_term).collect()),
            ],
        ),
        StmtKind::For {
            iterators,
            condition,
            body,
        } => node(
            NodeKind::For,
            vec![
                iterators_to_term(iterators),
                optional_expr(condition.as_ref()),
                block_to_term(body),
            ],
        ),
        StmtKind::While { condition, body } => node(
            NodeKind::While,
            vec![expr_to_term(condition), block_to_term(body)],
        ),
        StmtKind::DoWhile { body, condition } => node(
            NodeKind::DoWhile,
            vec![block_to_term(body), expr_to_term(condition)],
        ),
        StmtKind::Return(value) => node(NodeKind::Return, vec![optional_expr(value.as_ref())]),
        StmtKind::Break => node(NodeKind::Break, Vec::new()),
        StmtKind::Continue => node(NodeKind::Continue, Vec::new()),
        StmtKind::TryCatch {
            body,
            error_var,
            recovery,
        } => node(
            NodeKind::TryCatch,
            vec![
                block_to_term(body),
                variable_term(error_var.as_str()),
                block_to_term(recovery),
            ],
        ),
        StmtKind::Throw(value) => node(NodeKind::Throw, vec![expr_to_term(value)]),
        StmtKind::Check { body, recovery } => node(
            NodeKind::Check,
            vec![block_to_term(body), optional_block(recovery.as_ref())],
        ),
        StmtKind::Backtrack => node(NodeKind::Backtrack, Vec::new()),
    }
}

fn if_branch_to_term(index: usize, branch: &IfThenBranch) -> Value {
    match (&branch.condition, index) {
        (Some(c), 0) => node(
            NodeKind::IfThenBranch,
            vec![expr_to_term(c), block_to_term(&branch.body)],
        ),
        (Some(c), _) => node(
            NodeKind::IfThenElseIfBranch,
            vec![expr_to_term(c), block_to_term(&branch.body)],
        ),
        (None, _) => node(NodeKind::IfThenElseBranch, vec![block_to_term(&branch.body)]),
    }
}

fn switch_branch_to_term(branch: &SwitchBranch) -> Value {
    match &branch.condition {
        Some(c) => node(
            NodeKind::SwitchCaseBranch,
            vec![expr_to_term(c), block_to_term(&branch.body)],
        ),
        None => node(NodeKind::SwitchDefaultBranch, vec![block_to_term(&branch.body)]),
    }
}

fn match_branch_to_term(branch: &MatchBranch) -> Value {
    match branch {
        MatchBranch::Case {
            patterns,
            condition,
            body,
        } => node(
            NodeKind::MatchCaseBranch,
            vec![
                exprs_to_list(patterns),
                optional_expr(condition.as_ref()),
                block_to_term(body),
            ],
        ),
        MatchBranch::SplitList {
            heads,
            rest,
            condition,
            body,
        } => node(
            NodeKind::MatchSplitListBranch,
            vec![
                exprs_to_list(heads),
                expr_to_term(rest),
                optional_expr(condition.as_ref()),
                block_to_term(body),
            ],
        ),
        MatchBranch::Default { body } => node(NodeKind::MatchDefaultBranch, vec![block_to_term(body)]),
    }
}
