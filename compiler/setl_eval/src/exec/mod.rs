//! Execution of code trees.
//!
//! Each submodule adds one group of methods to [`Interpreter`]:
//!
//! - `expr`: expression evaluation, collection builders, quantifiers
//! - `stmt`: statements, loops, `try`, `check`
//! - `call`: procedure, builtin, class and method calls
//! - `assign`: assignment targets and `rw` write-back
//! - `iterate`: the iterator protocol shared by loops and builders
//! - `pattern`: `match` statements
//! - `quote`: `@(...)` quoted terms
//!
//! [`Interpreter`]: crate::Interpreter

mod assign;
mod call;
mod expr;
mod iterate;
mod pattern;
mod quote;
mod stmt;

pub(crate) use iterate::LoopAction;
