//! The interpreter façade.
//!
//! [`Interpreter`] is an explicit aggregate owning every piece of execution
//! state: the environment stack (active chain plus closure snapshots in use),
//! the call-stack recorder, the import table, the native module registry, the
//! per-function recursion counters and the print sink. Nothing lives in
//! globals, so independent instances can run side by side.
//!
//! Running a file is a fixed pipeline: tokenize, parse, hoist imports and
//! includes, then execute the remaining statements. Hoisting means every
//! `import`/`include` resolves and runs before the first ordinary statement,
//! and each one binds a namespace object under its base name.

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use reed_lex::tokenize;
use reed_par::{parse_statements, Statement};

use crate::builtins::standard_environment;
use crate::env::Environment;
use crate::error::{ReedError, RuntimeError};
use crate::output::{PrintSink, StdoutSink};
use crate::value::{Callable, CallableKind, NativeFn, Object, Value};

/// Maximum depth of nested calls to the same function.
pub const MAX_RECURSION_DEPTH: usize = 1000;

/// Number of call-stack frames shown before truncation.
const MAX_TRACE_FRAMES: usize = 10;

/// A native module: function names mapped to native functions, registered
/// under a library name and bound by `include`.
pub type NativeModule = Vec<(&'static str, NativeFn)>;

/// One recorded call-stack frame, innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFrame {
    pub name: String,
    pub origin: String,
    pub line: u32,
}

/// A complete Reed interpreter instance.
pub struct Interpreter {
    /// Environment stack. The last entry is the active chain; deeper entries
    /// are the callers' chains, swapped out while a closure runs.
    pub(crate) envs: Vec<Environment>,

    /// Call-stack frames recorded while an error propagates outward.
    pub(crate) trace: Vec<TraceFrame>,

    /// Unordered (importer, importee) pairs already resolved; a repeat means
    /// the files import each other.
    imports: FxHashSet<(String, String)>,

    /// Native modules available to `include`.
    modules: FxHashMap<String, NativeModule>,

    /// File whose statements are currently executing; stamped onto every
    /// function declared so call-stack frames can name the right file.
    pub(crate) origin: String,

    /// Active call depth per function name, for the recursion limit.
    pub(crate) call_depths: FxHashMap<String, usize>,

    /// Maximum depth of nested calls to one function.
    pub(crate) recursion_limit: usize,

    /// Destination of `print` and `exit` output.
    pub(crate) sink: Box<dyn PrintSink>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter printing to stdout.
    pub fn new() -> Self {
        Self::with_sink(Box::new(StdoutSink))
    }

    /// An interpreter printing to the given sink.
    pub fn with_sink(sink: Box<dyn PrintSink>) -> Self {
        Self {
            envs: vec![standard_environment()],
            trace: Vec::new(),
            imports: FxHashSet::default(),
            modules: FxHashMap::default(),
            origin: String::new(),
            call_depths: FxHashMap::default(),
            recursion_limit: MAX_RECURSION_DEPTH,
            sink,
        }
    }

    /// Makes a native module available to `include "name"`.
    pub fn register_module(&mut self, name: &str, module: NativeModule) {
        self.modules.insert(name.to_string(), module);
    }

    /// Overrides the per-function recursion limit. Embedders running inside
    /// constrained stacks lower this; the language default is
    /// [`MAX_RECURSION_DEPTH`].
    pub fn set_recursion_limit(&mut self, limit: usize) {
        self.recursion_limit = limit;
    }

    /// Runs a `.reed` file and returns its resulting global environment.
    ///
    /// An `exit` statement surfaces as [`ReedError::ProgramExit`]; callers
    /// treat it as success.
    pub fn run_file(&mut self, path: &str) -> Result<Environment, ReedError> {
        self.trace.clear();
        self.load_file(path)
    }

    /// Runs source text against the interpreter's own environment, which
    /// persists across calls. This is the REPL entry point.
    pub fn interpret(&mut self, filename: &str, source: &str) -> Result<(), ReedError> {
        self.trace.clear();
        self.run_source(filename, source)
    }

    /// The recorded call stack of the last failed run, formatted for
    /// display, or `None` if no user function was on the stack.
    pub fn call_trace(&self) -> Option<String> {
        if self.trace.is_empty() {
            return None;
        }

        let mut lines: Vec<String> = self
            .trace
            .iter()
            .take(MAX_TRACE_FRAMES)
            .map(|frame| format!("\tat {}() in {}, line {}", frame.name, frame.origin, frame.line))
            .collect();
        if self.trace.len() > MAX_TRACE_FRAMES {
            lines.push("\t...".to_string());
        }

        Some(lines.join("\n"))
    }

    /// The active environment chain.
    pub(crate) fn env(&self) -> &Environment {
        self.envs.last().expect("interpreter has no environment")
    }

    pub(crate) fn env_mut(&mut self) -> &mut Environment {
        self.envs.last_mut().expect("interpreter has no environment")
    }

    /// Loads and executes a file in a fresh environment, returning that
    /// environment. Used for the main file and, recursively, for imports.
    fn load_file(&mut self, path: &str) -> Result<Environment, ReedError> {
        if !path.ends_with(".reed") {
            return Err(ReedError::NotReedFile {
                name: path.to_string(),
            });
        }

        let source = std::fs::read_to_string(path).map_err(|_| ReedError::FileNotFound {
            name: path.to_string(),
        })?;

        self.envs.push(standard_environment());
        let result = self.run_source(path, &source);
        let env = self.envs.pop().expect("file environment missing");

        match result {
            Ok(()) => Ok(env),
            Err(error) => Err(ReedError::in_file(path, error)),
        }
    }

    /// Tokenizes, parses, hoists imports and includes, then executes.
    fn run_source(&mut self, filename: &str, source: &str) -> Result<(), ReedError> {
        let tokens = tokenize(source)?;
        let statements = parse_statements(&tokens)?;

        for statement in &statements {
            match statement {
                Statement::Import { name, line } => self.hoist_import(filename, name, *line)?,
                Statement::Include { name, line } => self.hoist_include(name, *line)?,
                _ => {}
            }
        }

        let saved_origin = std::mem::replace(&mut self.origin, filename.to_string());
        let result = self.execute(&statements);
        self.origin = saved_origin;
        result
    }

    /// Resolves one hoisted `import`: runs the file and binds its global
    /// environment as a namespace object under the file's base name.
    fn hoist_import(&mut self, importer: &str, name: &str, line: u32) -> Result<(), ReedError> {
        let path = format!("{name}.reed");

        let pair = if importer <= path.as_str() {
            (importer.to_string(), path.clone())
        } else {
            (path.clone(), importer.to_string())
        };
        if !self.imports.insert(pair) {
            return Err(ReedError::CircularImport {
                name: name.to_string(),
            });
        }

        let env = self.load_file(&path)?;

        let base = name.rsplit('/').next().unwrap_or(name).to_string();
        let mut fields = IndexMap::new();
        for (binding, value) in env.bindings() {
            fields.insert(binding, value);
        }

        self.declare_namespace(&base, fields, line)
    }

    /// Resolves one hoisted `include`: binds a native module's functions as
    /// a namespace object under the library name.
    fn hoist_include(&mut self, name: &str, line: u32) -> Result<(), ReedError> {
        let Some(module) = self.modules.get(name) else {
            return Err(ReedError::UnknownLibrary {
                name: name.to_string(),
            });
        };

        let mut fields = IndexMap::new();
        for (function_name, function) in module {
            let callable = Callable {
                name: (*function_name).to_string(),
                origin: name.to_string(),
                // Library functions validate their own arguments.
                arity: None,
                kind: CallableKind::Native(*function),
            };
            fields.insert(
                (*function_name).to_string(),
                Value::Callable(Rc::new(callable)),
            );
        }

        self.declare_namespace(name, fields, line)
    }

    fn declare_namespace(
        &mut self,
        name: &str,
        fields: IndexMap<String, Value>,
        line: u32,
    ) -> Result<(), ReedError> {
        let namespace = Value::object(Object::new(name, fields));
        self.env_mut()
            .declare(name, namespace)
            .map_err(|kind| ReedError::Runtime(RuntimeError::new(kind, line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CaptureSink;

    fn capturing() -> (Interpreter, CaptureSink) {
        let sink = CaptureSink::new();
        let interp = Interpreter::with_sink(Box::new(sink.clone()));
        (interp, sink)
    }

    #[test]
    fn interpret_runs_statements() {
        let (mut interp, sink) = capturing();
        interp.interpret("test", "print 1 + 2 * 3;").unwrap();
        assert_eq!(sink.contents(), "7\n");
    }

    #[test]
    fn environment_persists_across_interpret_calls() {
        let (mut interp, sink) = capturing();
        interp.interpret("test", "x := 10;").unwrap();
        interp.interpret("test", "print x;").unwrap();
        assert_eq!(sink.contents(), "10\n");
    }

    #[test]
    fn instances_are_independent() {
        let (mut a, _) = capturing();
        let (mut b, _) = capturing();
        a.interpret("test", "x := 1;").unwrap();
        assert!(b.interpret("test", "print x;").is_err());
    }

    #[test]
    fn include_binds_namespace_object() {
        fn shout(_args: &[Value]) -> Result<Value, RuntimeError> {
            Ok(Value::Str("HI".into()))
        }

        let (mut interp, sink) = capturing();
        interp.register_module("noise", vec![("shout", shout)]);
        interp
            .interpret("test", "include \"noise\"; print noise.shout();")
            .unwrap();
        assert_eq!(sink.contents(), "HI\n");
    }

    #[test]
    fn unknown_library_is_reported() {
        let (mut interp, _) = capturing();
        let error = interp
            .interpret("test", "include \"nonexistent\";")
            .unwrap_err();
        assert!(matches!(error, ReedError::UnknownLibrary { .. }));
    }

    #[test]
    fn run_file_rejects_other_extensions() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            interp.run_file("program.txt"),
            Err(ReedError::NotReedFile { .. })
        ));
    }

    #[test]
    fn run_file_reports_missing_files() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            interp.run_file("no/such/file.reed"),
            Err(ReedError::FileNotFound { .. })
        ));
    }
}
