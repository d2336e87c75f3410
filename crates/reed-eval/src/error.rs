//! Runtime error and control-flow types.
//!
//! Failures and control flow travel on the same channel: every evaluator
//! method returns `Result<_, Interrupt>`. `break`, `skip`, `return` and
//! `exit` are [`Interrupt`] variants that unwind to the nearest enclosing
//! loop or function; only [`Interrupt::Failure`] is ever user-visible.
//!
//! A [`RuntimeError`] carries an optional line that is filled in exactly once
//! at the nearest boundary that knows it, and never re-formatted afterwards.

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// The closed set of runtime failure kinds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("variable '{name}' is already defined")]
    AlreadyDefined { name: String },

    #[error("'{object}' has no attribute '{field}'")]
    NotAField { object: String, field: String },

    #[error("invalid operator '{op}' for type '{type_name}'")]
    InvalidOperatorType { op: String, type_name: String },

    #[error("invalid operator '{op}' for types '{left}' and '{right}'")]
    InvalidOperatorTypes {
        op: String,
        left: String,
        right: String,
    },

    #[error("cannot use operator '{op}' on different types '{left}' and '{right}'")]
    DifferentTypes {
        op: String,
        left: String,
        right: String,
    },

    #[error("type '{type_name}' is not an array")]
    NotArray { type_name: String },

    #[error("type '{type_name}' has no attributes")]
    NotObject { type_name: String },

    #[error("type '{type_name}' is not a function")]
    NotFunction { type_name: String },

    #[error("expected integer value")]
    NotInteger,

    #[error("illegal type '{type_name}' returned to interpreter")]
    IllegalType { type_name: String },

    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },

    #[error("cannot pop empty array")]
    EmptyArray,

    #[error("{name}() expected {expected} args, got {got}")]
    IncorrectArgs {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("division by 0")]
    DivideByZero,

    #[error("infinite loop: range will never reach stop value")]
    InfiniteLoop,

    #[error("maximum recursion depth reached in '{name}'")]
    MaximumRecursion { name: String },

    #[error("cannot assign to this expression")]
    NonAssignable,

    #[error("'{keyword}' statement used outside its enclosing block")]
    StrayInterrupt { keyword: &'static str },

    /// Payload of an `error` statement, formatted and raised as-is.
    #[error("{message}")]
    Raised { message: String },

    /// Failure reported by a native library function.
    #[error("{message}")]
    NativeCall { message: String },
}

/// A runtime failure with an optional source line.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: Option<u32>,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, line: u32) -> Self {
        Self {
            kind,
            line: Some(line),
        }
    }

    /// An error whose line is not yet known; native functions use this and
    /// the call boundary fills the line in.
    pub fn without_line(kind: RuntimeErrorKind) -> Self {
        Self { kind, line: None }
    }

    /// Attaches a line if none is set yet. A line already present wins.
    pub fn with_line(mut self, line: u32) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
        }
        self
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}, line {}", self.kind, line),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Result channel of the evaluator: a failure or a control-flow unwind.
#[derive(Debug)]
pub enum Interrupt {
    /// A user-visible runtime failure.
    Failure(RuntimeError),

    /// `return` unwinding to the nearest function call.
    Return(Value),

    /// `break` unwinding to the nearest loop.
    Break,

    /// `skip` unwinding to the nearest loop iteration.
    Skip,

    /// `exit` unwinding out of the whole program.
    Exit,
}

impl From<RuntimeError> for Interrupt {
    fn from(error: RuntimeError) -> Self {
        Interrupt::Failure(error)
    }
}

/// Shorthand for a failure interrupt at a known line.
pub(crate) fn fail(kind: RuntimeErrorKind, line: u32) -> Interrupt {
    Interrupt::Failure(RuntimeError::new(kind, line))
}

/// Top-level error type of the interpreter façade.
#[derive(Debug, Error)]
pub enum ReedError {
    #[error(transparent)]
    Lex(#[from] reed_lex::LexError),

    #[error(transparent)]
    Parse(#[from] reed_par::ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("circular import of '{name}'")]
    CircularImport { name: String },

    #[error("cannot find file with name '{name}'")]
    FileNotFound { name: String },

    #[error("cannot run non-reed file '{name}'")]
    NotReedFile { name: String },

    #[error("'{name}' is not a library")]
    UnknownLibrary { name: String },

    /// An error that crossed a file boundary, prefixed with the file name.
    #[error("{file}: {source}")]
    InFile {
        file: String,
        #[source]
        source: Box<ReedError>,
    },

    /// Sentinel for the `exit` statement. Callers treat it as success; it is
    /// an error variant only so it unwinds through nested imports.
    #[error("program exit")]
    ProgramExit,
}

impl ReedError {
    /// Wraps an error with the file it came from. Already-wrapped errors and
    /// the exit sentinel pass through untouched.
    pub fn in_file(file: &str, error: ReedError) -> ReedError {
        match error {
            ReedError::InFile { .. } | ReedError::ProgramExit => error,
            other => ReedError::InFile {
                file: file.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// True when the error is the `exit` sentinel rather than a failure.
    pub fn is_exit(&self) -> bool {
        matches!(self, ReedError::ProgramExit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_is_appended_once() {
        let error = RuntimeError::without_line(RuntimeErrorKind::DivideByZero);
        assert_eq!(error.to_string(), "division by 0");

        let error = error.with_line(4);
        assert_eq!(error.to_string(), "division by 0, line 4");

        // A later boundary must not overwrite the line.
        let error = error.with_line(9);
        assert_eq!(error.to_string(), "division by 0, line 4");
    }

    #[test]
    fn operator_type_message_shape() {
        let error = RuntimeError::new(
            RuntimeErrorKind::InvalidOperatorTypes {
                op: "+".into(),
                left: "number".into(),
                right: "string".into(),
            },
            1,
        );
        assert_eq!(
            error.to_string(),
            "invalid operator '+' for types 'number' and 'string', line 1"
        );
    }

    #[test]
    fn file_wrapping_is_idempotent() {
        let inner = ReedError::Runtime(RuntimeError::new(RuntimeErrorKind::DivideByZero, 2));
        let wrapped = ReedError::in_file("main.reed", inner);
        assert_eq!(wrapped.to_string(), "main.reed: division by 0, line 2");

        let rewrapped = ReedError::in_file("other.reed", wrapped);
        assert_eq!(rewrapped.to_string(), "main.reed: division by 0, line 2");
    }

    #[test]
    fn exit_sentinel_is_never_wrapped() {
        let wrapped = ReedError::in_file("main.reed", ReedError::ProgramExit);
        assert!(wrapped.is_exit());
    }
}
