//! Errors and control signals of evaluation.
//!
//! Every failure is an [`EvalError`] whose [`EvalErrorKind`] places it in
//! the language's error taxonomy. Factory functions are the public API;
//! they fill in both the kind and a human-readable message.
//!
//! Non-local control flow travels on the `Err` side of evaluation as a
//! [`ControlAction`]: loops intercept `Break`/`Continue`, calls intercept
//! `Return`, `try` intercepts catchable `Error`s and only `check`
//! intercepts `Backtrack`.

use std::fmt;

use setl_ir::Span;

use crate::value::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, ControlAction>;

/// Result of executing a statement.
pub type ExecResult = Result<(), ControlAction>;

/// Result of an operation that can fail but never signals control flow.
pub type ValueResult = Result<Value, EvalError>;

/// Error taxonomy.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("incompatible type")]
    IncompatibleType,
    #[error("undefined operation")]
    UndefinedOperation,
    #[error("index out of range")]
    IndexOutOfRange,
    #[error("number too large")]
    NumberTooLarge,
    #[error("unknown function")]
    UnknownFunction,
    #[error("malformed term")]
    MalformedTerm,
    #[error("syntax error")]
    SyntaxError,
    #[error("file not writable")]
    FileNotWritable,
    #[error("matrix error")]
    MatrixError,
    #[error("runtime error")]
    Runtime,
    /// `throw(v)`; the value is handed to the `catch` variable unchanged.
    #[error("thrown value {0}")]
    Thrown(Value),
    #[error("recursion limit exceeded")]
    RecursionLimit,
    /// Interpreter bug. Never caught by `try`.
    #[error("internal error")]
    Internal,
}

impl EvalErrorKind {
    /// Name of the variant, used in diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::IncompatibleType => "IncompatibleType",
            Self::UndefinedOperation => "UndefinedOperation",
            Self::IndexOutOfRange => "IndexOutOfRange",
            Self::NumberTooLarge => "NumberTooLarge",
            Self::UnknownFunction => "UnknownFunction",
            Self::MalformedTerm => "MalformedTerm",
            Self::SyntaxError => "SyntaxError",
            Self::FileNotWritable => "FileNotWritable",
            Self::MatrixError => "MatrixError",
            Self::Runtime => "Runtime",
            Self::Thrown(_) => "Thrown",
            Self::RecursionLimit => "RecursionLimit",
            Self::Internal => "Internal",
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
    /// Where the error was raised, when known.
    pub span: Option<Span>,
    /// Secondary context, innermost first ("in procedure call f(x)").
    pub notes: Vec<String>,
}

impl EvalError {
    /// Runtime error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(EvalErrorKind::Runtime, message)
    }

    pub fn with_kind(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    /// Attach a span unless one is already present.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_dummy() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Whether `try`/`catch` may intercept this error.
    pub fn is_catchable(&self) -> bool {
        !matches!(self.kind, EvalErrorKind::Internal)
    }

    /// Value bound to the `catch` variable.
    pub fn into_catch_value(self) -> Value {
        match self.kind {
            EvalErrorKind::Thrown(value) => value,
            _ => Value::error(self.message),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " (at {span})")?;
        }
        for note in &self.notes {
            write!(f, "\n    {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

/// Non-local exit from statement or expression evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    Break,
    Continue,
    Return(Value),
    Error(EvalError),
    /// Search failure raised by `backtrack`; only `check` intercepts it.
    Backtrack,
}

impl ControlAction {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, ControlAction::Error(_))
    }

    /// Convert a signal that escaped its construct into an error.
    pub fn into_eval_error(self) -> EvalError {
        match self {
            ControlAction::Error(e) => e,
            ControlAction::Break => runtime("`break` outside of a loop"),
            ControlAction::Continue => runtime("`continue` outside of a loop"),
            ControlAction::Return(_) => runtime("`return` outside of a procedure"),
            ControlAction::Backtrack => runtime("`backtrack` outside of a `check` block"),
        }
    }

    /// Attach a span to errors; other signals pass through.
    #[must_use]
    pub fn with_span_if_error(self, span: Span) -> Self {
        match self {
            ControlAction::Error(e) => ControlAction::Error(e.with_span(span)),
            other => other,
        }
    }
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(e: EvalError) -> Self {
        ControlAction::Error(e)
    }
}

// Type errors

#[cold]
pub fn incompatible_type(message: impl Into<String>) -> EvalError {
    EvalError::with_kind(EvalErrorKind::IncompatibleType, message)
}

/// `left op right` is not defined for these operand kinds.
#[cold]
pub fn incompatible_operands(left: &Value, op: &str, right: &Value) -> EvalError {
    incompatible_type(format!(
        "Right-hand side of \"{left} {op} {right}\" is incompatible with its left-hand side."
    ))
}

#[cold]
pub fn not_a_boolean(context: &str, value: &Value) -> EvalError {
    incompatible_type(format!("{context} \"{value}\" is not a Boolean value."))
}

#[cold]
pub fn not_an_integer(context: &str, value: &Value) -> EvalError {
    incompatible_type(format!("{context} \"{value}\" is not an integer."))
}

#[cold]
pub fn not_a_collection(value: &Value) -> EvalError {
    incompatible_type(format!("\"{value}\" is not a collection value."))
}

#[cold]
pub fn negative_multiplier(kind: &str) -> EvalError {
    incompatible_type(format!("{kind} multiplier is negative."))
}

// Operation errors

#[cold]
pub fn undefined_operation(message: impl Into<String>) -> EvalError {
    EvalError::with_kind(EvalErrorKind::UndefinedOperation, message)
}

#[cold]
pub fn division_by_zero() -> EvalError {
    undefined_operation("Division by zero.")
}

#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> EvalError {
    let word = if expected == 1 { "argument" } else { "arguments" };
    undefined_operation(format!(
        "Procedure {name} is defined with {expected} {word}, but was called with {got}."
    ))
}

#[cold]
pub fn not_assignable(target: &str) -> EvalError {
    undefined_operation(format!("Expression \"{target}\" cannot be used as an assignment target."))
}

#[cold]
pub fn no_such_member(member: &str, value: &Value) -> EvalError {
    undefined_operation(format!("Member \"{member}\" is undefined in \"{value}\"."))
}

// Index errors

#[cold]
pub fn index_out_of_range(index: impl fmt::Display, size: usize) -> EvalError {
    EvalError::with_kind(
        EvalErrorKind::IndexOutOfRange,
        format!("Index {index} is out of range for a collection of size {size}."),
    )
}

#[cold]
pub fn number_too_large(value: impl fmt::Display) -> EvalError {
    EvalError::with_kind(
        EvalErrorKind::NumberTooLarge,
        format!("Number {value} is too large for this operation."),
    )
}

// Call errors

#[cold]
pub fn unknown_function(callee: &str) -> EvalError {
    EvalError::with_kind(
        EvalErrorKind::UnknownFunction,
        format!("Identifier \"{callee}\" is undefined or not a procedure."),
    )
}

#[cold]
pub fn recursion_limit(limit: usize) -> EvalError {
    EvalError::with_kind(
        EvalErrorKind::RecursionLimit,
        format!("Maximum call depth of {limit} exceeded."),
    )
}

// Term errors

#[cold]
pub fn malformed_term(what: &str) -> EvalError {
    EvalError::with_kind(EvalErrorKind::MalformedTerm, format!("malformed {what}"))
}

#[cold]
pub fn syntax_error(message: impl Into<String>) -> EvalError {
    EvalError::with_kind(EvalErrorKind::SyntaxError, message)
}

// Collaborator errors

#[cold]
pub fn file_not_writable(path: &str, reason: impl fmt::Display) -> EvalError {
    EvalError::with_kind(
        EvalErrorKind::FileNotWritable,
        format!("File \"{path}\" could not be written: {reason}"),
    )
}

#[cold]
pub fn matrix_error(message: impl Into<String>) -> EvalError {
    EvalError::with_kind(EvalErrorKind::MatrixError, message)
}

// Generic

#[cold]
pub fn runtime(message: impl Into<String>) -> EvalError {
    EvalError::with_kind(EvalErrorKind::Runtime, message)
}

#[cold]
pub fn thrown(value: Value) -> EvalError {
    let message = format!("Error: {}", value.to_unquoted_string());
    EvalError::with_kind(EvalErrorKind::Thrown(value), message)
}

#[cold]
pub fn internal(message: impl Into<String>) -> EvalError {
    EvalError::with_kind(EvalErrorKind::Internal, message)
}
