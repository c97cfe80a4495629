//! Console and file access for the `get`, `readFile`, `writeFile` and
//! `appendFile` builtins.
//!
//! [`FsIoHandler`] talks to stdin and the filesystem; [`MemoryIoHandler`]
//! keeps files and queued input lines in memory so programs can be tested
//! without touching either.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use setl_patterns::errors::{file_not_writable, runtime};
use setl_patterns::EvalError;

pub trait IoHandler {
    /// Next line of input without its terminator; `None` at end of input.
    fn read_line(&self, prompt: &str) -> Result<Option<String>, EvalError>;

    /// Lines of the file at `path`.
    fn read_file(&self, path: &str) -> Result<Vec<String>, EvalError>;

    /// Replace the file at `path` with `content`.
    fn write_file(&self, path: &str, content: &str) -> Result<(), EvalError>;

    /// Append `content` to the file at `path`, creating it if needed.
    fn append_file(&self, path: &str, content: &str) -> Result<(), EvalError>;
}

pub type SharedIoHandler = Rc<dyn IoHandler>;

/// Stdin and the local filesystem.
#[derive(Default)]
pub struct FsIoHandler;

impl IoHandler for FsIoHandler {
    fn read_line(&self, prompt: &str) -> Result<Option<String>, EvalError> {
        if !prompt.is_empty() {
            print!("{prompt}");
            io::stdout()
                .flush()
                .map_err(|e| runtime(format!("Could not write prompt: {e}")))?;
        }
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| runtime(format!("Could not read input: {e}")))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_owned()))
    }

    fn read_file(&self, path: &str) -> Result<Vec<String>, EvalError> {
        let content = fs::read_to_string(path)
            .map_err(|e| runtime(format!("File \"{path}\" could not be read: {e}")))?;
        Ok(content.lines().map(str::to_owned).collect())
    }

    fn write_file(&self, path: &str, content: &str) -> Result<(), EvalError> {
        fs::write(path, content).map_err(|e| file_not_writable(path, e))
    }

    fn append_file(&self, path: &str, content: &str) -> Result<(), EvalError> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| file_not_writable(path, &e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| file_not_writable(path, e))
    }
}

/// In-memory files and a queue of input lines.
#[derive(Default)]
pub struct MemoryIoHandler {
    files: Mutex<FxHashMap<String, String>>,
    input: Mutex<VecDeque<String>>,
}

impl MemoryIoHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue lines returned by successive `read_line` calls.
    #[must_use]
    pub fn with_input<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input.lock().extend(lines.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files.lock().insert(path.to_owned(), content.to_owned());
        self
    }

    /// Current content of an in-memory file.
    pub fn file(&self, path: &str) -> Option<String> {
        self.files.lock().get(path).cloned()
    }
}

impl IoHandler for MemoryIoHandler {
    fn read_line(&self, _prompt: &str) -> Result<Option<String>, EvalError> {
        Ok(self.input.lock().pop_front())
    }

    fn read_file(&self, path: &str) -> Result<Vec<String>, EvalError> {
        match self.files.lock().get(path) {
            Some(content) => Ok(content.lines().map(str::to_owned).collect()),
            None => Err(runtime(format!("File \"{path}\" could not be read."))),
        }
    }

    fn write_file(&self, path: &str, content: &str) -> Result<(), EvalError> {
        self.files.lock().insert(path.to_owned(), content.to_owned());
        Ok(())
    }

    fn append_file(&self, path: &str, content: &str) -> Result<(), EvalError> {
        self.files
            .lock()
            .entry(path.to_owned())
            .or_default()
            .push_str(content);
        Ok(())
    }
}

pub fn fs_io_handler() -> SharedIoHandler {
    Rc::new(FsIoHandler)
}

pub fn memory_io_handler() -> Rc<MemoryIoHandler> {
    Rc::new(MemoryIoHandler::new())
}
