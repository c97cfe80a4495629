//! Statement nodes.

use super::expr::{Expr, IterBinding};
use crate::kind::NodeKind;
use crate::{Name, Span};

/// Sequence of statements executed in order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Block { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// One branch of an `if`; `condition == None` is the trailing `else`.
#[derive(Clone, Debug, PartialEq)]
pub struct IfThenBranch {
    pub condition: Option<Expr>,
    pub body: Block,
}

/// One branch of a `switch`; `condition == None` is `default`.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchBranch {
    pub condition: Option<Expr>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MatchBranch {
    /// `case p1, p2 | condition: body`
    Case {
        patterns: Vec<Expr>,
        condition: Option<Expr>,
        body: Block,
    },
    /// `case [h1, h2 | rest] | condition: body`; heads and rest are
    /// variables or `_`.
    SplitList {
        heads: Vec<Expr>,
        rest: Box<Expr>,
        condition: Option<Expr>,
        body: Block,
    },
    /// `default: body`
    Default { body: Block },
}

impl MatchBranch {
    pub fn body(&self) -> &Block {
        match self {
            MatchBranch::Case { body, .. }
            | MatchBranch::SplitList { body, .. }
            | MatchBranch::Default { body } => body,
        }
    }

    pub const fn node_kind(&self) -> NodeKind {
        match self {
            MatchBranch::Case { .. } => NodeKind::MatchCaseBranch,
            MatchBranch::SplitList { .. } => NodeKind::MatchSplitListBranch,
            MatchBranch::Default { .. } => NodeKind::MatchDefaultBranch,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// Expression evaluated for its effect.
    Expr(Expr),
    IfThen(Vec<IfThenBranch>),
    Switch(Vec<SwitchBranch>),
    Match {
        subject: Expr,
        branches: Vec<MatchBranch>,
    },
    For {
        iterators: Vec<IterBinding>,
        condition: Option<Expr>,
        body: Block,
    },
    While {
        condition: Expr,
        body: Block,
    },
    DoWhile {
        body: Block,
        condition: Expr,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    TryCatch {
        body: Block,
        error_var: Name,
        recovery: Block,
    },
    /// `throw(e)`: raise a user error carrying the value of `e`.
    Throw(Expr),
    /// `check { body } afterBacktrack { recovery }`
    Check {
        body: Block,
        recovery: Option<Block>,
    },
    Backtrack,
}

impl Stmt {
    #[inline]
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }

    #[inline]
    pub fn synthetic(kind: StmtKind) -> Self {
        Stmt {
            kind,
            span: Span::DUMMY,
        }
    }

    /// Kind used for the term representation; expression statements are
    /// represented by their expression.
    pub fn node_kind(&self) -> Option<NodeKind> {
        let kind = match &self.kind {
            StmtKind::Expr(_) => return None,
            StmtKind::IfThen(_) => NodeKind::IfThen,
            StmtKind::Switch(_) => NodeKind::Switch,
            StmtKind::Match { .. } => NodeKind::Match,
            StmtKind::For { .. } => NodeKind::For,
            StmtKind::While { .. } => NodeKind::While,
            StmtKind::DoWhile { .. } => NodeKind::DoWhile,
            StmtKind::Return(_) => NodeKind::Return,
            StmtKind::Break => NodeKind::Break,
            StmtKind::Continue => NodeKind::Continue,
            StmtKind::TryCatch { .. } => NodeKind::TryCatch,
            StmtKind::Throw(_) => NodeKind::Throw,
            StmtKind::Check { .. } => NodeKind::Check,
            StmtKind::Backtrack => NodeKind::Backtrack,
        };
        Some(kind)
    }
}
