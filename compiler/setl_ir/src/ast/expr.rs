//! Expression nodes.

use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::Signed;

use super::operators::{AssignOp, BinaryOp, UnaryOp, PREC_ASSIGN, PREC_ATOM, PREC_LAMBDA, PREC_POSTFIX, PREC_PREFIX};
use super::stmt::Block;
use crate::kind::NodeKind;
use crate::{Name, Span};

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Literal constants.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// `om`
    Om,
    Bool(bool),
    Integer(BigInt),
    Float(f64),
    /// Already unescaped runtime text.
    Str(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Variable(Name),
    /// `_`
    Ignore,

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// `target := value`; the target is a variable, `_`, an explicit list
    /// of targets, a collection access or a member access.
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// `target += value` and friends.
    CompoundAssign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },

    /// `f(a, b)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `c[i]`, or `m[i, j]` on matrices
    CollectionAccess {
        target: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `c[lo..hi]`, either bound may be missing
    AccessRange {
        target: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
    },
    /// `f{x}`
    CollectMap {
        target: Box<Expr>,
        arg: Box<Expr>,
    },
    /// `o.member`
    MemberAccess {
        target: Box<Expr>,
        member: Name,
    },

    List(CollectionBuilder),
    Set(CollectionBuilder),

    Exists {
        iterators: Vec<IterBinding>,
        condition: Box<Expr>,
    },
    Forall {
        iterators: Vec<IterBinding>,
        condition: Box<Expr>,
    },

    Procedure(Rc<ProcedureDef>),
    Class(Rc<ClassDef>),

    /// User term `F(a, b)`; arguments are evaluated.
    Term {
        functional_character: Name,
        args: Vec<Expr>,
    },
    /// `@(e)`: the quoted term of `e`.
    Quote(Box<Expr>),
}

/// The three ways of filling a list or set.
#[derive(Clone, Debug, PartialEq)]
pub enum CollectionBuilder {
    /// `[a, b, c]`
    ///
    /// Clones of the node share `elements`; the evaluator uses that
    /// allocation as the identity of the literal.
    Explicit { elements: Rc<[Expr]> },
    /// `[first..last]` or `[first, second..last]`
    Range {
        first: Box<Expr>,
        second: Option<Box<Expr>>,
        last: Box<Expr>,
    },
    /// `[element : x in s, y in t | condition]`
    Iteration {
        element: Box<Expr>,
        iterators: Vec<IterBinding>,
        condition: Option<Box<Expr>>,
    },
}

impl CollectionBuilder {
    pub fn explicit(elements: Vec<Expr>) -> Self {
        CollectionBuilder::Explicit {
            elements: elements.into(),
        }
    }
}

/// One `target in collection` link of an iterator chain.
#[derive(Clone, Debug, PartialEq)]
pub struct IterBinding {
    /// A variable, `_`, or an explicit list of targets such as `[k, v]`.
    pub target: Expr,
    pub collection: Expr,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ProcedureKind {
    /// Runs with the global frame as parent.
    Procedure,
    /// Captures the defining frame.
    Closure,
    /// `x |-> e`; captures like a closure.
    Lambda,
}

impl ProcedureKind {
    pub const fn node_kind(self) -> NodeKind {
        match self {
            Self::Procedure => NodeKind::Procedure,
            Self::Closure => NodeKind::Closure,
            Self::Lambda => NodeKind::LambdaProcedure,
        }
    }

    pub const fn captures_scope(self) -> bool {
        !matches!(self, Self::Procedure)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParamMode {
    ReadOnly,
    /// `rw x`: the final value is written back to the caller's argument.
    ReadWrite,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: Name,
    pub mode: ParamMode,
}

impl Param {
    pub fn read_only(name: impl Into<Name>) -> Self {
        Param {
            name: name.into(),
            mode: ParamMode::ReadOnly,
        }
    }

    pub fn read_write(name: impl Into<Name>) -> Self {
        Param {
            name: name.into(),
            mode: ParamMode::ReadWrite,
        }
    }

    pub fn is_read_write(&self) -> bool {
        self.mode == ParamMode::ReadWrite
    }
}

/// Procedure, closure or lambda definition.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcedureDef {
    pub kind: ProcedureKind,
    pub params: Vec<Param>,
    /// For lambdas, a single `return` of the lambda expression.
    pub body: Block,
}

impl ProcedureDef {
    /// Body expression of a lambda.
    pub fn lambda_body(&self) -> Option<&Expr> {
        if self.kind != ProcedureKind::Lambda {
            return None;
        }
        match self.body.stmts.as_slice() {
            [stmt] => match &stmt.kind {
                super::StmtKind::Return(Some(e)) => Some(e),
                _ => None,
            },
            _ => None,
        }
    }
}

/// `class (params) { body }`
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    pub params: Vec<Param>,
    pub body: Block,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Node without source position.
    #[inline]
    pub fn synthetic(kind: ExprKind) -> Self {
        Expr {
            kind,
            span: Span::DUMMY,
        }
    }

    /// Binding strength used when re-printing.
    pub fn precedence(&self) -> u16 {
        match &self.kind {
            ExprKind::Literal(Literal::Integer(i)) if i.is_negative() => PREC_PREFIX,
            ExprKind::Literal(Literal::Float(f)) if f.is_sign_negative() => PREC_PREFIX,
            ExprKind::Binary { op, .. } => op.precedence(),
            ExprKind::Unary { op, .. } => op.precedence(),
            ExprKind::Assign { .. } | ExprKind::CompoundAssign { .. } => PREC_ASSIGN,
            ExprKind::Call { .. }
            | ExprKind::CollectionAccess { .. }
            | ExprKind::AccessRange { .. }
            | ExprKind::CollectMap { .. }
            | ExprKind::MemberAccess { .. } => PREC_POSTFIX,
            ExprKind::Procedure(def) if def.kind == ProcedureKind::Lambda => PREC_LAMBDA,
            _ => PREC_ATOM,
        }
    }

    /// Kind used for the term representation, `None` for nodes that are
    /// represented by plain values (literals, `_`, explicit collections,
    /// user terms).
    pub fn node_kind(&self) -> Option<NodeKind> {
        let kind = match &self.kind {
            ExprKind::Literal(Literal::Om) => NodeKind::Om,
            ExprKind::Literal(_)
            | ExprKind::Ignore
            | ExprKind::Term { .. }
            | ExprKind::List(CollectionBuilder::Explicit { .. })
            | ExprKind::Set(CollectionBuilder::Explicit { .. }) => return None,
            ExprKind::Variable(_) => NodeKind::Variable,
            ExprKind::Binary { op, .. } => op.node_kind(),
            ExprKind::Unary { op, .. } => op.node_kind(),
            ExprKind::Assign { .. } => NodeKind::Assignment,
            ExprKind::CompoundAssign { op, .. } => op.node_kind(),
            ExprKind::Call { .. } => NodeKind::Call,
            ExprKind::CollectionAccess { .. } => NodeKind::CollectionAccess,
            ExprKind::AccessRange { .. } => NodeKind::AccessRange,
            ExprKind::CollectMap { .. } => NodeKind::CollectMap,
            ExprKind::MemberAccess { .. } => NodeKind::MemberAccess,
            ExprKind::List(_) => NodeKind::ListConstructor,
            ExprKind::Set(_) => NodeKind::SetConstructor,
            ExprKind::Exists { .. } => NodeKind::Exists,
            ExprKind::Forall { .. } => NodeKind::Forall,
            ExprKind::Procedure(def) => def.kind.node_kind(),
            ExprKind::Class(_) => NodeKind::Class,
            ExprKind::Quote(_) => NodeKind::Quote,
        };
        Some(kind)
    }

    /// Variable name if this is a plain variable.
    pub fn as_variable(&self) -> Option<&Name> {
        match &self.kind {
            ExprKind::Variable(name) => Some(name),
            _ => None,
        }
    }
}
