//! Code representation for the SetlX evaluator.
//!
//! This crate holds everything about programs that does not need runtime
//! values:
//!
//! - [`Name`] and [`Span`]
//! - the code tree ([`Expr`], [`Stmt`], [`Block`]) and its operators
//! - [`NodeKind`], from which every node's functional character is derived
//! - printing with minimal parentheses ([`printer`])
//! - the bound/unbound/used binding analysis ([`VariableSets`])
//! - [`build`] helpers for assembling trees without a parser

pub mod analysis;
pub mod ast;
pub mod build;
pub mod escape;
pub mod kind;
mod name;
pub mod printer;
mod span;

pub use analysis::VariableSets;
pub use ast::{
    AssignOp, BinaryOp, Block, ClassDef, CollectionBuilder, Expr, ExprKind,
    IfThenBranch, IterBinding, Literal, MatchBranch, Param, ParamMode, ProcedureDef,
    ProcedureKind, Stmt, StmtKind, SwitchBranch, UnaryOp,
};
pub use kind::{functional_character, NodeKind};
pub use name::Name;
pub use span::Span;
