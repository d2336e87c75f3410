//! reed-eval - Tree-walking evaluation for the Reed language.
//!
//! This crate holds the runtime: the value model, the scoped environment,
//! the statement executor and expression evaluator, and the [`Interpreter`]
//! façade that drives lexer, parser, and evaluator over whole files,
//! resolving imports and includes along the way.
//!
//! ```
//! use reed_eval::{CaptureSink, Interpreter};
//!
//! let sink = CaptureSink::new();
//! let mut interp = Interpreter::with_sink(Box::new(sink.clone()));
//! interp.interpret("demo", "print 1 + 2 * 3;").unwrap();
//! assert_eq!(sink.contents(), "7\n");
//! ```

mod builtins;
mod env;
mod error;
mod exec;
mod expr;
mod interp;
mod output;
mod value;

pub use builtins::standard_environment;
pub use env::{Environment, Scope};
pub use error::{Interrupt, ReedError, RuntimeError, RuntimeErrorKind};
pub use interp::{Interpreter, NativeModule, TraceFrame, MAX_RECURSION_DEPTH};
pub use output::{CaptureSink, PrintSink, StdoutSink};
pub use value::{format_number, Callable, CallableKind, NativeFn, Object, Value};
