//! `InterpreterBuilder` for creating interpreters with various configurations.

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use setl_patterns::{DenseBackend, LinearAlgebra, TermConverter};

use super::{ConstantCache, ExecutionFlags, Interpreter, DEFAULT_MAX_CALL_DEPTH};
use crate::builtins::BuiltinRegistry;
use crate::io_handler::{fs_io_handler, SharedIoHandler};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::Environment;

/// Builder for creating [`Interpreter`] instances.
///
/// Defaults: stdout output, filesystem I/O, an entropy-seeded random source,
/// the dense matrix backend and no flags.
pub struct InterpreterBuilder {
    print_handler: Option<SharedPrintHandler>,
    io_handler: Option<SharedIoHandler>,
    linear_algebra: Option<Rc<dyn LinearAlgebra>>,
    seed: Option<u64>,
    max_call_depth: usize,
    flags: ExecutionFlags,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            print_handler: None,
            io_handler: None,
            linear_algebra: None,
            seed: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            flags: ExecutionFlags::empty(),
        }
    }

    /// Where `print`, `nPrint` and result lines go.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Console input and files for `get`, `readFile`, `writeFile` and
    /// `appendFile`.
    #[must_use]
    pub fn io_handler(mut self, handler: SharedIoHandler) -> Self {
        self.io_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn linear_algebra(mut self, backend: Rc<dyn LinearAlgebra>) -> Self {
        self.linear_algebra = Some(backend);
        self
    }

    /// Fix the random source so `random`, `rnd` and `shuffle` repeat.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Deepest allowed nesting of procedure calls.
    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: ExecutionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn build(self) -> Interpreter {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Interpreter {
            env: Environment::new(),
            flags: self.flags,
            rng,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            io: self.io_handler.unwrap_or_else(fs_io_handler),
            terms: Rc::new(TermConverter::new()),
            builtins: Rc::new(BuiltinRegistry::new()),
            linear_algebra: self
                .linear_algebra
                .unwrap_or_else(|| Rc::new(DenseBackend)),
            constants: ConstantCache::default(),
            call_depth: 0,
            max_call_depth: self.max_call_depth,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
