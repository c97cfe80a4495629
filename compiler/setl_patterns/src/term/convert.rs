//! Reconstruction of code from terms.
//!
//! [`TermConverter`] maps each functional character to the function that
//! rebuilds the node. The table is filled explicitly in
//! [`TermConverter::new`]; the interpreter builds it once and keeps it.
//! Kinds that only occur nested inside another node (parameters, iterators,
//! branches) are decoded by their parent and are not registered.

use std::rc::Rc;

use num_bigint::BigInt;
use rustc_hash::FxHashMap;
use setl_ir::{
    AssignOp, BinaryOp, Block, ClassDef, CollectionBuilder, Expr, ExprKind, IfThenBranch,
    IterBinding, Literal, MatchBranch, Name, NodeKind, Param, ProcedureDef, ProcedureKind, Stmt,
    StmtKind, SwitchBranch, UnaryOp,
};
use setl_stack::ensure_sufficient_stack;
use tracing::trace;

use super::NIL;
use crate::errors::{malformed_term, EvalError};
use crate::value::{TermValue, Value};

type ExprBuilder = fn(&TermConverter, NodeKind, &[Value]) -> Result<Expr, EvalError>;
type StmtBuilder = fn(&TermConverter, NodeKind, &[Value]) -> Result<Stmt, EvalError>;

/// Registry from functional character to reconstruction function.
pub struct TermConverter {
    expressions: FxHashMap<&'static str, (NodeKind, ExprBuilder)>,
    statements: FxHashMap<&'static str, (NodeKind, StmtBuilder)>,
}

/// Exactly `N` arguments, or a `MalformedTerm` error naming the kind.
fn arity<const N: usize>(kind: NodeKind, args: &[Value]) -> Result<&[Value; N], EvalError> {
    <&[Value; N]>::try_from(args).map_err(|_| {
        malformed_term(&format!(
            "{} term: expected {N} arguments, found {}",
            kind.functional_character(),
            args.len()
        ))
    })
}

fn list_of<'a>(value: &'a Value, what: &str) -> Result<&'a [Value], EvalError> {
    value
        .as_list()
        .ok_or_else(|| malformed_term(&format!("{what}: expected a list, found {value}")))
}

fn string_of<'a>(value: &'a Value, what: &str) -> Result<&'a str, EvalError> {
    value
        .as_str()
        .ok_or_else(|| malformed_term(&format!("{what}: expected a string, found {value}")))
}

fn is_nil(value: &Value) -> bool {
    value
        .as_term()
        .is_some_and(|t| t.functional_character().as_str() == NIL && t.args().is_empty())
}

/// The term if it has the given kind.
fn term_of(value: &Value, kind: NodeKind) -> Option<&TermValue> {
    value
        .as_term()
        .filter(|t| t.functional_character().as_str() == kind.functional_character())
}

fn synthetic(kind: ExprKind) -> Expr {
    Expr::synthetic(kind)
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::synthetic(kind)
}

fn binary_op(kind: NodeKind) -> Option<BinaryOp> {
    BinaryOp::ALL.into_iter().find(|op| op.node_kind() == kind)
}

fn unary_op(kind: NodeKind) -> Option<UnaryOp> {
    UnaryOp::ALL.into_iter().find(|op| op.node_kind() == kind)
}

fn assign_op(kind: NodeKind) -> Option<AssignOp> {
    AssignOp::ALL.into_iter().find(|op| op.node_kind() == kind)
}

impl TermConverter {
    /// Registry with every expression and statement kind.
    pub fn new() -> Self {
        let mut converter = TermConverter {
            expressions: FxHashMap::default(),
            statements: FxHashMap::default(),
        };

        converter.expr(NodeKind::Variable, Self::variable);
        converter.expr(NodeKind::Om, Self::om);
        for op in BinaryOp::ALL {
            converter.expr(op.node_kind(), Self::binary);
        }
        for op in UnaryOp::ALL {
            converter.expr(op.node_kind(), Self::unary);
        }
        converter.expr(NodeKind::Assignment, Self::assignment);
        for op in AssignOp::ALL {
            converter.expr(op.node_kind(), Self::compound_assignment);
        }
        converter.expr(NodeKind::Call, Self::call);
        converter.expr(NodeKind::CollectionAccess, Self::collection_access);
        converter.expr(NodeKind::AccessRange, Self::access_range);
        converter.expr(NodeKind::CollectMap, Self::collect_map);
        converter.expr(NodeKind::MemberAccess, Self::member_access);
        converter.expr(NodeKind::ListConstructor, Self::constructor);
        converter.expr(NodeKind::SetConstructor, Self::constructor);
        converter.expr(NodeKind::Exists, Self::quantifier);
        converter.expr(NodeKind::Forall, Self::quantifier);
        converter.expr(NodeKind::Procedure, Self::procedure);
        converter.expr(NodeKind::Closure, Self::procedure);
        converter.expr(NodeKind::LambdaProcedure, Self::lambda);
        converter.expr(NodeKind::Class, Self::class);
        converter.expr(NodeKind::Quote, Self::quote);

        converter.stmt(NodeKind::IfThen, Self::if_then);
        converter.stmt(NodeKind::Switch, Self::switch);
        converter.stmt(NodeKind::Match, Self::match_stmt);
        converter.stmt(NodeKind::For, Self::for_loop);
        converter.stmt(NodeKind::While, Self::while_loop);
        converter.stmt(NodeKind::DoWhile, Self::do_while);
        converter.stmt(NodeKind::Return, Self::return_stmt);
        converter.stmt(NodeKind::Break, Self::jump);
        converter.stmt(NodeKind::Continue, Self::jump);
        converter.stmt(NodeKind::Backtrack, Self::jump);
        converter.stmt(NodeKind::TryCatch, Self::try_catch);
        converter.stmt(NodeKind::Throw, Self::throw);
        converter.stmt(NodeKind::Check, Self::check);

        trace!(kinds = converter.len(), "term registry built");
        converter
    }

    fn expr(&mut self, kind: NodeKind, builder: ExprBuilder) {
        self.expressions
            .insert(kind.functional_character(), (kind, builder));
    }

    fn stmt(&mut self, kind: NodeKind, builder: StmtBuilder) {
        self.statements
            .insert(kind.functional_character(), (kind, builder));
    }

    /// Number of registered functional characters.
    pub fn len(&self) -> usize {
        self.expressions.len() + self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `fc` reconstructs to code.
    pub fn is_registered(&self, fc: &str) -> bool {
        self.expressions.contains_key(fc) || self.statements.contains_key(fc)
    }

    // Entry points

    /// Rebuild an expression.
    pub fn term_to_expr(&self, term: &Value) -> Result<Expr, EvalError> {
        ensure_sufficient_stack(|| self.term_to_expr_inner(term))
    }

    fn term_to_expr_inner(&self, term: &Value) -> Result<Expr, EvalError> {
        let kind = match term {
            Value::Undefined => ExprKind::Literal(Literal::Om),
            Value::Ignore => ExprKind::Ignore,
            Value::Bool(b) => ExprKind::Literal(Literal::Bool(*b)),
            Value::Rational(r) => match r.to_integer() {
                Some(i) => ExprKind::Literal(Literal::Integer(i.clone())),
                None => ExprKind::Binary {
                    op: BinaryOp::Quotient,
                    left: Box::new(integer(r.numerator())),
                    right: Box::new(integer(r.denominator())),
                },
            },
            Value::Float(f) => ExprKind::Literal(Literal::Float(f.0)),
            Value::Str(s) => ExprKind::Literal(Literal::Str(s.as_str().to_owned())),
            Value::List(items) => ExprKind::List(CollectionBuilder::explicit(self.exprs(items)?)),
            Value::Set(items) => {
                let elements = items
                    .iter()
                    .map(|e| self.term_to_expr(e))
                    .collect::<Result<_, _>>()?;
                ExprKind::Set(CollectionBuilder::explicit(elements))
            }
            Value::Term(t) => return self.term_expr(t),
            other => return Err(malformed_term(&format!("expression term {other}"))),
        };
        Ok(synthetic(kind))
    }

    fn term_expr(&self, t: &TermValue) -> Result<Expr, EvalError> {
        let fc = t.functional_character();
        if let Some((kind, builder)) = self.expressions.get(fc.as_str()) {
            return builder(self, *kind, t.args());
        }
        if self.statements.contains_key(fc.as_str()) {
            return Err(malformed_term(&format!(
                "expression term: {fc} is a statement"
            )));
        }
        if fc.as_str().starts_with('^') {
            return Err(malformed_term(&format!(
                "term: unknown functional character {fc}"
            )));
        }
        Ok(synthetic(ExprKind::Term {
            functional_character: fc.clone(),
            args: self.exprs(t.args())?,
        }))
    }

    /// Rebuild a statement; anything that is not a statement term becomes
    /// an expression statement.
    pub fn term_to_stmt(&self, term: &Value) -> Result<Stmt, EvalError> {
        ensure_sufficient_stack(|| {
            if let Some(t) = term.as_term() {
                let fc = t.functional_character().as_str();
                if let Some((kind, builder)) = self.statements.get(fc) {
                    return builder(self, *kind, t.args());
                }
                if fc == NodeKind::Block.functional_character() {
                    return Err(malformed_term("statement term: nested ^block"));
                }
            }
            Ok(stmt(StmtKind::Expr(self.term_to_expr(term)?)))
        })
    }

    /// Rebuild a block from `^block([stmt, ...])`.
    pub fn term_to_block(&self, term: &Value) -> Result<Block, EvalError> {
        let Some(t) = term_of(term, NodeKind::Block) else {
            return Err(malformed_term(&format!("block term {term}")));
        };
        let [stmts] = arity::<1>(NodeKind::Block, t.args())?;
        let stmts = list_of(stmts, "^block")?
            .iter()
            .map(|s| self.term_to_stmt(s))
            .collect::<Result<_, _>>()?;
        Ok(Block::new(stmts))
    }

    // Shared pieces

    fn exprs(&self, terms: &[Value]) -> Result<Vec<Expr>, EvalError> {
        terms.iter().map(|t| self.term_to_expr(t)).collect()
    }

    fn boxed(&self, term: &Value) -> Result<Box<Expr>, EvalError> {
        self.term_to_expr(term).map(Box::new)
    }

    fn optional(&self, term: &Value) -> Result<Option<Expr>, EvalError> {
        if is_nil(term) {
            Ok(None)
        } else {
            self.term_to_expr(term).map(Some)
        }
    }

    fn optional_block(&self, term: &Value) -> Result<Option<Block>, EvalError> {
        if is_nil(term) {
            Ok(None)
        } else {
            self.term_to_block(term).map(Some)
        }
    }

    fn iterators(&self, term: &Value) -> Result<Vec<IterBinding>, EvalError> {
        list_of(term, "iterator list")?
            .iter()
            .map(|it| {
                let t = term_of(it, NodeKind::Iterator)
                    .ok_or_else(|| malformed_term(&format!("iterator term {it}")))?;
                let [target, collection] = arity::<2>(NodeKind::Iterator, t.args())?;
                Ok(IterBinding {
                    target: self.term_to_expr(target)?,
                    collection: self.term_to_expr(collection)?,
                })
            })
            .collect()
    }

    fn params(term: &Value) -> Result<Vec<Param>, EvalError> {
        list_of(term, "parameter list")?
            .iter()
            .map(|p| {
                let t = p
                    .as_term()
                    .ok_or_else(|| malformed_term(&format!("parameter term {p}")))?;
                let kind = NodeKind::from_functional_character(t.functional_character().as_str());
                let [name] = arity::<1>(kind.unwrap_or(NodeKind::Parameter), t.args())?;
                let name = string_of(name, "parameter name")?;
                match kind {
                    Some(NodeKind::Parameter) => Ok(Param::read_only(name)),
                    Some(NodeKind::RwParameter) => Ok(Param::read_write(name)),
                    _ => Err(malformed_term(&format!("parameter term {p}"))),
                }
            })
            .collect()
    }

    // Expression builders

    fn variable(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [name] = arity::<1>(kind, args)?;
        let name = string_of(name, "^variable")?;
        Ok(synthetic(ExprKind::Variable(Name::from(name))))
    }

    fn om(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        arity::<0>(kind, args)?;
        Ok(synthetic(ExprKind::Literal(Literal::Om)))
    }

    fn binary(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [left, right] = arity::<2>(kind, args)?;
        let op = binary_op(kind).ok_or_else(|| malformed_term(kind.functional_character()))?;
        Ok(synthetic(ExprKind::Binary {
            op,
            left: self.boxed(left)?,
            right: self.boxed(right)?,
        }))
    }

    fn unary(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [operand] = arity::<1>(kind, args)?;
        let op = unary_op(kind).ok_or_else(|| malformed_term(kind.functional_character()))?;
        Ok(synthetic(ExprKind::Unary {
            op,
            operand: self.boxed(operand)?,
        }))
    }

    fn assignment(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [target, value] = arity::<2>(kind, args)?;
        Ok(synthetic(ExprKind::Assign {
            target: self.boxed(target)?,
            value: self.boxed(value)?,
        }))
    }

    fn compound_assignment(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [target, value] = arity::<2>(kind, args)?;
        let op = assign_op(kind).ok_or_else(|| malformed_term(kind.functional_character()))?;
        Ok(synthetic(ExprKind::CompoundAssign {
            op,
            target: self.boxed(target)?,
            value: self.boxed(value)?,
        }))
    }

    fn call(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [callee, actuals] = arity::<2>(kind, args)?;
        Ok(synthetic(ExprKind::Call {
            callee: self.boxed(callee)?,
            args: self.exprs(list_of(actuals, "^call arguments")?)?,
        }))
    }

    fn collection_access(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [target, indexes] = arity::<2>(kind, args)?;
        Ok(synthetic(ExprKind::CollectionAccess {
            target: self.boxed(target)?,
            args: self.exprs(list_of(indexes, "^collectionAccess arguments")?)?,
        }))
    }

    fn access_range(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [target, low, high] = arity::<3>(kind, args)?;
        Ok(synthetic(ExprKind::AccessRange {
            target: self.boxed(target)?,
            low: self.optional(low)?.map(Box::new),
            high: self.optional(high)?.map(Box::new),
        }))
    }

    fn collect_map(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [target, arg] = arity::<2>(kind, args)?;
        Ok(synthetic(ExprKind::CollectMap {
            target: self.boxed(target)?,
            arg: self.boxed(arg)?,
        }))
    }

    fn member_access(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [target, member] = arity::<2>(kind, args)?;
        Ok(synthetic(ExprKind::MemberAccess {
            target: self.boxed(target)?,
            member: Name::from(string_of(member, "^memberAccess member")?),
        }))
    }

    fn constructor(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [builder] = arity::<1>(kind, args)?;
        let builder = self.builder(builder)?;
        Ok(synthetic(if kind == NodeKind::SetConstructor {
            ExprKind::Set(builder)
        } else {
            ExprKind::List(builder)
        }))
    }

    fn builder(&self, term: &Value) -> Result<CollectionBuilder, EvalError> {
        if let Some(items) = term.as_list() {
            return Ok(CollectionBuilder::explicit(self.exprs(items)?));
        }
        if let Some(t) = term_of(term, NodeKind::Range) {
            let [first, second, last] = arity::<3>(NodeKind::Range, t.args())?;
            return Ok(CollectionBuilder::Range {
                first: self.boxed(first)?,
                second: self.optional(second)?.map(Box::new),
                last: self.boxed(last)?,
            });
        }
        if let Some(t) = term_of(term, NodeKind::Iteration) {
            let [element, iterators, condition] = arity::<3>(NodeKind::Iteration, t.args())?;
            return Ok(CollectionBuilder::Iteration {
                element: self.boxed(element)?,
                iterators: self.iterators(iterators)?,
                condition: self.optional(condition)?.map(Box::new),
            });
        }
        Err(malformed_term(&format!("collection builder term {term}")))
    }

    fn quantifier(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [iterators, condition] = arity::<2>(kind, args)?;
        let iterators = self.iterators(iterators)?;
        let condition = self.boxed(condition)?;
        Ok(synthetic(if kind == NodeKind::Exists {
            ExprKind::Exists {
                iterators,
                condition,
            }
        } else {
            ExprKind::Forall {
                iterators,
                condition,
            }
        }))
    }

    fn procedure(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [params, body] = arity::<2>(kind, args)?;
        let kind = if kind == NodeKind::Closure {
            ProcedureKind::Closure
        } else {
            ProcedureKind::Procedure
        };
        Ok(synthetic(ExprKind::Procedure(Rc::new(ProcedureDef {
            kind,
            params: Self::params(params)?,
            body: self.term_to_block(body)?,
        }))))
    }

    fn lambda(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [params, body] = arity::<2>(kind, args)?;
        let body = self.term_to_expr(body)?;
        Ok(synthetic(ExprKind::Procedure(Rc::new(ProcedureDef {
            kind: ProcedureKind::Lambda,
            params: Self::params(params)?,
            body: Block::new(vec![stmt(StmtKind::Return(Some(body)))]),
        }))))
    }

    fn class(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [params, body] = arity::<2>(kind, args)?;
        Ok(synthetic(ExprKind::Class(Rc::new(ClassDef {
            params: Self::params(params)?,
            body: self.term_to_block(body)?,
        }))))
    }

    fn quote(&self, kind: NodeKind, args: &[Value]) -> Result<Expr, EvalError> {
        let [inner] = arity::<1>(kind, args)?;
        Ok(synthetic(ExprKind::Quote(self.boxed(inner)?)))
    }

    // Statement builders

    fn if_then(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        let [branches] = arity::<1>(kind, args)?;
        let branches = list_of(branches, "^ifThen branches")?;
        let mut out = Vec::with_capacity(branches.len());
        for (i, b) in branches.iter().enumerate() {
            let t = b
                .as_term()
                .ok_or_else(|| malformed_term(&format!("if branch {b}")))?;
            let bkind = NodeKind::from_functional_character(t.functional_character().as_str());
            let branch = match bkind {
                Some(k @ (NodeKind::IfThenBranch | NodeKind::IfThenElseIfBranch))
                    if (k == NodeKind::IfThenBranch) == (i == 0) =>
                {
                    let [condition, body] = arity::<2>(k, t.args())?;
                    IfThenBranch {
                        condition: Some(self.term_to_expr(condition)?),
                        body: self.term_to_block(body)?,
                    }
                }
                Some(NodeKind::IfThenElseBranch) if i > 0 && i + 1 == branches.len() => {
                    let [body] = arity::<1>(NodeKind::IfThenElseBranch, t.args())?;
                    IfThenBranch {
                        condition: None,
                        body: self.term_to_block(body)?,
                    }
                }
                _ => return Err(malformed_term(&format!("if branch {b}"))),
            };
            out.push(branch);
        }
        if out.is_empty() {
            return Err(malformed_term("^ifThen term: no branches"));
        }
        Ok(stmt(StmtKind::IfThen(out)))
    }

    fn switch(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        let [branches] = arity::<1>(kind, args)?;
        let branches = list_of(branches, "^switch branches")?;
        let mut out = Vec::with_capacity(branches.len());
        for (i, b) in branches.iter().enumerate() {
            let branch = if let Some(t) = term_of(b, NodeKind::SwitchCaseBranch) {
                let [condition, body] = arity::<2>(NodeKind::SwitchCaseBranch, t.args())?;
                SwitchBranch {
                    condition: Some(self.term_to_expr(condition)?),
                    body: self.term_to_block(body)?,
                }
            } else if let Some(t) = term_of(b, NodeKind::SwitchDefaultBranch)
                .filter(|_| i + 1 == branches.len())
            {
                let [body] = arity::<1>(NodeKind::SwitchDefaultBranch, t.args())?;
                SwitchBranch {
                    condition: None,
                    body: self.term_to_block(body)?,
                }
            } else {
                return Err(malformed_term(&format!("switch branch {b}")));
            };
            out.push(branch);
        }
        Ok(stmt(StmtKind::Switch(out)))
    }

    fn match_stmt(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        let [subject, branches] = arity::<2>(kind, args)?;
        let branches = list_of(branches, "^match branches")?
            .iter()
            .map(|b| self.match_branch(b))
            .collect::<Result<_, _>>()?;
        Ok(stmt(StmtKind::Match {
            subject: self.term_to_expr(subject)?,
            branches,
        }))
    }

    fn match_branch(&self, term: &Value) -> Result<MatchBranch, EvalError> {
        if let Some(t) = term_of(term, NodeKind::MatchCaseBranch) {
            let [patterns, condition, body] = arity::<3>(NodeKind::MatchCaseBranch, t.args())?;
            return Ok(MatchBranch::Case {
                patterns: self.exprs(list_of(patterns, "case patterns")?)?,
                condition: self.optional(condition)?,
                body: self.term_to_block(body)?,
            });
        }
        if let Some(t) = term_of(term, NodeKind::MatchSplitListBranch) {
            let [heads, rest, condition, body] =
                arity::<4>(NodeKind::MatchSplitListBranch, t.args())?;
            return Ok(MatchBranch::SplitList {
                heads: self.exprs(list_of(heads, "split-list heads")?)?,
                rest: self.boxed(rest)?,
                condition: self.optional(condition)?,
                body: self.term_to_block(body)?,
            });
        }
        if let Some(t) = term_of(term, NodeKind::MatchDefaultBranch) {
            let [body] = arity::<1>(NodeKind::MatchDefaultBranch, t.args())?;
            return Ok(MatchBranch::Default {
                body: self.term_to_block(body)?,
            });
        }
        Err(malformed_term(&format!("match branch {term}")))
    }

    fn for_loop(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        let [iterators, condition, body] = arity::<3>(kind, args)?;
        Ok(stmt(StmtKind::For {
            iterators: self.iterators(iterators)?,
            condition: self.optional(condition)?,
            body: self.term_to_block(body)?,
        }))
    }

    fn while_loop(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        let [condition, body] = arity::<2>(kind, args)?;
        Ok(stmt(StmtKind::While {
            condition: self.term_to_expr(condition)?,
            body: self.term_to_block(body)?,
        }))
    }

    fn do_while(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        let [body, condition] = arity::<2>(kind, args)?;
        Ok(stmt(StmtKind::DoWhile {
            body: self.term_to_block(body)?,
            condition: self.term_to_expr(condition)?,
        }))
    }

    fn return_stmt(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        let [value] = arity::<1>(kind, args)?;
        Ok(stmt(StmtKind::Return(self.optional(value)?)))
    }

    fn jump(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        arity::<0>(kind, args)?;
        Ok(stmt(match kind {
            NodeKind::Break => StmtKind::Break,
            NodeKind::Continue => StmtKind::Continue,
            _ => StmtKind::Backtrack,
        }))
    }

    fn try_catch(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        let [body, error_var, recovery] = arity::<3>(kind, args)?;
        let var = term_of(error_var, NodeKind::Variable)
            .and_then(|t| match t.args() {
                [Value::Str(name)] => Some(Name::from(name.as_str())),
                _ => None,
            })
            .ok_or_else(|| malformed_term(&format!("catch variable {error_var}")))?;
        Ok(stmt(StmtKind::TryCatch {
            body: self.term_to_block(body)?,
            error_var: var,
            recovery: self.term_to_block(recovery)?,
        }))
    }

    fn throw(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        let [value] = arity::<1>(kind, args)?;
        Ok(stmt(StmtKind::Throw(self.term_to_expr(value)?)))
    }

    fn check(&self, kind: NodeKind, args: &[Value]) -> Result<Stmt, EvalError> {
        let [body, recovery] = arity::<2>(kind, args)?;
        Ok(stmt(StmtKind::Check {
            body: self.term_to_block(body)?,
            recovery: self.optional_block(recovery)?,
        }))
    }
}

impl Default for TermConverter {
    fn default() -> Self {
        Self::new()
    }
}

fn integer(i: &BigInt) -> Expr {
    synthetic(ExprKind::Literal(Literal::Integer(i.clone())))
}
