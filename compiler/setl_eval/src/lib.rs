#![allow(
    clippy::result_large_err,
    reason = "ControlAction carries EvalError by value on every evaluation path"
)]
//! Setl Eval - tree-walking evaluator for SetlX programs.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Interpreter`: explicit execution state (frames, flags, random source,
//!   handlers, term and builtin registries)
//! - `Environment`: a pointer into a chain of reference-counted frames
//! - `evaluate_binary` / `evaluate_unary`: enum-based operator dispatch
//! - `BuiltinRegistry`: predefined procedures resolved by name
//! - `Value` and the term machinery from `setl_patterns`
//!
//! Control flow (`return`, `break`, `continue`, `backtrack`) travels as
//! `Err(ControlAction)` next to errors, so `?` unwinds every construct
//! until the one that handles the signal.

mod builtins;
mod environment;
pub mod exec;
pub mod interpreter;
pub mod io_handler;
mod operators;
pub mod print_handler;

use std::sync::Once;

pub use setl_patterns::{ControlAction, EvalError, EvalErrorKind, EvalResult, Value};

pub use builtins::{Arity, BuiltinRegistry};
pub use environment::Environment;
pub use interpreter::{
    ExecutionFlags, Interpreter, InterpreterBuilder, ScopedInterpreter, DEFAULT_MAX_CALL_DEPTH,
};
pub use io_handler::{
    fs_io_handler, memory_io_handler, FsIoHandler, IoHandler, MemoryIoHandler, SharedIoHandler,
};
pub use operators::{evaluate_binary, evaluate_unary};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandlerImpl, SharedPrintHandler,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=setl_eval=debug` or
/// `RUST_LOG=setl_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
