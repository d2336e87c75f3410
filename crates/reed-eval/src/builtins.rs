//! Global built-in functions.
//!
//! Every fresh environment starts with `len`, `push` and `pop` declared in
//! its global scope. Unlike included library modules these have a declared
//! arity, so the call site enforces the argument count.

use std::rc::Rc;

use crate::env::Environment;
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::value::{Callable, CallableKind, NativeFn, Value};

/// A fresh environment with the global built-ins declared.
pub fn standard_environment() -> Environment {
    let mut env = Environment::new();
    for (name, arity, function) in BUILTINS {
        let callable = Callable {
            name: (*name).to_string(),
            origin: "builtin".to_string(),
            arity: Some(*arity),
            kind: CallableKind::Native(*function),
        };
        env.declare(name, Value::Callable(Rc::new(callable)))
            .expect("duplicate builtin name");
    }

    env
}

const BUILTINS: &[(&str, usize, NativeFn)] = &[
    ("len", 1, builtin_len),
    ("push", 2, builtin_push),
    ("pop", 1, builtin_pop),
];

/// Length of an array or string.
fn builtin_len(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Array(values) => Ok(Value::Number(values.borrow().len() as f64)),
        Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
        other => Err(RuntimeError::without_line(RuntimeErrorKind::NotArray {
            type_name: other.type_name().to_string(),
        })),
    }
}

/// Appends a value to the end of an array.
fn builtin_push(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Array(values) => {
            values.borrow_mut().push(args[1].clone());
            Ok(Value::Nil)
        }
        other => Err(RuntimeError::without_line(RuntimeErrorKind::NotArray {
            type_name: other.type_name().to_string(),
        })),
    }
}

/// Removes and returns the last element of an array.
fn builtin_pop(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Array(values) => values
            .borrow_mut()
            .pop()
            .ok_or_else(|| RuntimeError::without_line(RuntimeErrorKind::EmptyArray)),
        other => Err(RuntimeError::without_line(RuntimeErrorKind::NotArray {
            type_name: other.type_name().to_string(),
        })),
    }
}
