//! reed-lib - Standard library modules for the Reed language.
//!
//! Each module is a list of native functions registered under a library name
//! and bound into a program by `include "name";`. Library functions are
//! declared without a core-side arity and validate their own arguments (see
//! [`args`](crate::args)).
//!
//! ```
//! use reed_eval::{CaptureSink, Interpreter};
//!
//! let sink = CaptureSink::new();
//! let mut interp = Interpreter::with_sink(Box::new(sink.clone()));
//! reed_lib::install(&mut interp);
//! interp
//!     .interpret("demo", "include \"str\"; print str.upper(\"hi\");")
//!     .unwrap();
//! assert_eq!(sink.contents(), "HI\n");
//! ```

use reed_eval::Interpreter;

mod args;
pub mod io;
pub mod math;
pub mod std_mod;
pub mod str_mod;

/// Registers every standard library module with an interpreter.
pub fn install(interp: &mut Interpreter) {
    interp.register_module("io", io::module());
    interp.register_module("str", str_mod::module());
    interp.register_module("math", math::module());
    interp.register_module("std", std_mod::module());
}
