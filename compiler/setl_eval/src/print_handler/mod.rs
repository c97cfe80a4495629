//! Where interpreter output goes.
//!
//! Three kinds of text reach the handler: program output from `print` and
//! `nPrint`, `// Result:` lines for top-level expressions in verbose mode,
//! and `~< Trace: ... >~` lines for traced assignments. The handler owns the
//! framing of the latter two so every sink renders them the same way.
//!
//! A sink is stdout, a capture buffer (tests, embedders) or nothing.

use std::fmt::Display;
use std::sync::Arc;

use parking_lot::Mutex;

/// Output sink, dispatched by `match` on every write.
pub enum PrintHandlerImpl {
    Stdout,
    /// Captures everything written for [`output`](Self::output).
    Buffer(Mutex<String>),
    Silent,
}

impl PrintHandlerImpl {
    /// Program output without a line break (`nPrint`).
    pub fn print(&self, text: &str) {
        match self {
            Self::Stdout => print!("{text}"),
            Self::Buffer(buffer) => buffer.lock().push_str(text),
            Self::Silent => {}
        }
    }

    /// Program output followed by a line break (`print`).
    pub fn println(&self, text: &str) {
        match self {
            Self::Stdout => println!("{text}"),
            Self::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(text);
                buffer.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Value of a top-level expression statement.
    pub fn result(&self, value: impl Display) {
        self.println(&format!("// Result: {value}"));
    }

    /// New value of a traced variable.
    pub fn trace_assignment(&self, name: &str, value: impl Display) {
        self.println(&format!("~< Trace: {name} := {value} >~"));
    }

    /// Everything captured so far; empty unless buffering.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buffer) => buffer.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    /// Drop captured output.
    pub fn clear(&self) {
        if let Self::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }
}

/// Shared handler; embedders keep a clone to read captured output.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}

#[cfg(test)]
mod tests;
