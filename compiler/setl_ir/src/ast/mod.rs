//! Code tree consumed by the evaluator.
//!
//! Trees are immutable once built. Procedure and class definitions sit
//! behind `Rc` because procedure values share them with the tree they were
//! defined in.
//!
//! - `expr`: expressions, collection builders, procedure definitions
//! - `stmt`: statements and blocks
//! - `operators`: operators and printing precedence

mod expr;
pub mod operators;
mod stmt;

pub use expr::{
    ClassDef, CollectionBuilder, Expr, ExprKind, IterBinding, Literal, Param,
    ParamMode, ProcedureDef, ProcedureKind,
};
pub use operators::{AssignOp, BinaryOp, UnaryOp};
pub use stmt::{Block, IfThenBranch, MatchBranch, Stmt, StmtKind, SwitchBranch};
