//! Tree-walking interpreter for SetlX programs.
//!
//! The [`Interpreter`] is the explicit execution state threaded through
//! every evaluation step: the frame chain, the random source, flags, the
//! print and I/O handlers, the term registry and the builtin registry.
//! Evaluation itself lives in `crate::exec`:
//!
//! - `exec::expr` - expressions, collection builders, quantifiers
//! - `exec::stmt` - statements and control signals
//! - `exec::call` - procedure, builtin, class and method calls
//! - `exec::assign` - assignment targets and write-back
//! - `exec::iterate` - the iterator protocol shared by loops and builders
//! - `exec::pattern` - `match` branches
//! - `exec::quote` - quoted terms

mod builder;
mod constants;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub(crate) use constants::ConstantCache;
pub use scope_guard::ScopedInterpreter;

use std::rc::Rc;

use bitflags::bitflags;
use rand::rngs::StdRng;
use setl_ir::{Block, Name, StmtKind};
use setl_patterns::errors::recursion_limit;
use setl_patterns::{ControlAction, EvalError, LinearAlgebra, TermConverter, Value};
use tracing::warn;

use crate::builtins::BuiltinRegistry;
use crate::io_handler::SharedIoHandler;
use crate::print_handler::SharedPrintHandler;
use crate::Environment;

/// Nesting of procedure calls allowed before `RecursionLimit` is raised.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

bitflags! {
    /// Switches of the interactive front-end.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ExecutionFlags: u8 {
        /// Print `// Result: v` after every top-level expression statement.
        const VERBOSE_RESULTS = 1 << 0;
        /// Print `~< Trace: x := v >~` after every variable assignment.
        const TRACE_ASSIGNMENTS = 1 << 1;
        /// Log closure captures and call entry at debug level.
        const RUNTIME_DEBUGGING = 1 << 2;
    }
}

/// Execution state of one program run.
pub struct Interpreter {
    pub(crate) env: Environment,
    pub(crate) flags: ExecutionFlags,
    pub(crate) rng: StdRng,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) io: SharedIoHandler,
    /// Functional character to reconstruction function, built once.
    pub(crate) terms: Rc<TermConverter>,
    pub(crate) builtins: Rc<BuiltinRegistry>,
    pub(crate) linear_algebra: Rc<dyn LinearAlgebra>,
    pub(crate) constants: ConstantCache,
    pub(crate) call_depth: usize,
    pub(crate) max_call_depth: usize,
}

impl Interpreter {
    /// Interpreter with default handlers; see [`InterpreterBuilder`].
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    #[inline]
    pub(crate) fn check_recursion_limit(&self) -> Result<(), EvalError> {
        if self.call_depth >= self.max_call_depth {
            return Err(recursion_limit(self.max_call_depth));
        }
        Ok(())
    }

    #[inline]
    pub fn flags(&self) -> ExecutionFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: ExecutionFlags) {
        self.flags = flags;
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Output captured by a buffer print handler.
    pub fn get_print_output(&self) -> String {
        self.print_handler.output()
    }

    pub fn term_converter(&self) -> &TermConverter {
        &self.terms
    }

    /// Value of a variable as seen from the current frame.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.env.lookup(name)
    }

    /// Bind a global variable, e.g. program arguments.
    pub fn define_global(&mut self, name: impl Into<Name>, value: Value) {
        self.env.define_global(name.into(), value);
    }

    /// Run a whole program in the global frame.
    ///
    /// Signals that escape their construct become errors: a stray `break`,
    /// `continue` or `return` and an uncaught `backtrack`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn execute_program(&mut self, program: &Block) -> Result<(), EvalError> {
        for stmt in &program.stmts {
            let outcome = match &stmt.kind {
                StmtKind::Expr(expr) => self.eval(expr).map(|value| {
                    if self.flags.contains(ExecutionFlags::VERBOSE_RESULTS) {
                        self.print_handler.result(&value);
                    }
                }),
                _ => self.exec_stmt(stmt),
            };
            if let Err(action) = outcome {
                if matches!(action, ControlAction::Backtrack) {
                    warn!("backtrack escaped every check block");
                }
                return Err(action.with_span_if_error(stmt.span).into_eval_error());
            }
        }
        Ok(())
    }

    /// Names a program reads before any write, excluding builtins. Each
    /// one is also reported through `tracing::warn!`.
    pub fn undefined_variable_warnings(&self, program: &Block) -> Vec<Name> {
        let undefined: Vec<Name> = program
            .unbound_variables()
            .into_iter()
            .filter(|name| !self.builtins.contains(name.as_str()) && self.lookup(name.as_str()).is_none())
            .collect();
        for name in &undefined {
            warn!(variable = %name, "variable is read before it is assigned");
        }
        undefined
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
