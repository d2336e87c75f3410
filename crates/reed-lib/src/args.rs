//! Argument validation helpers for native library functions.
//!
//! Library functions are declared without a core-side arity, so every
//! function checks its own argument count and types here. Errors carry no
//! line; the call boundary in the evaluator fills it in.

use reed_eval::{RuntimeError, RuntimeErrorKind, Value};

/// Fails unless exactly `count` arguments were passed.
pub(crate) fn expect_len(name: &str, args: &[Value], count: usize) -> Result<(), RuntimeError> {
    if args.len() != count {
        return Err(RuntimeError::without_line(
            RuntimeErrorKind::IncorrectArgs {
                name: name.to_string(),
                expected: count,
                got: args.len(),
            },
        ));
    }

    Ok(())
}

/// The argument at `index` as a string.
pub(crate) fn string_arg<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a str, RuntimeError> {
    match &args[index] {
        Value::Str(s) => Ok(s),
        other => Err(type_mismatch(name, index, "string", other)),
    }
}

/// The argument at `index` as a number.
pub(crate) fn number_arg(name: &str, args: &[Value], index: usize) -> Result<f64, RuntimeError> {
    match &args[index] {
        Value::Number(n) => Ok(*n),
        other => Err(type_mismatch(name, index, "number", other)),
    }
}

/// A failure with the library's own message text.
pub(crate) fn call_error(message: impl Into<String>) -> RuntimeError {
    RuntimeError::without_line(RuntimeErrorKind::NativeCall {
        message: message.into(),
    })
}

fn type_mismatch(name: &str, index: usize, expected: &str, got: &Value) -> RuntimeError {
    call_error(format!(
        "{name}() expected arg {} to be {expected}, got {}",
        index + 1,
        got.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_len_checks_count() {
        assert!(expect_len("f", &[Value::Nil], 1).is_ok());
        let error = expect_len("f", &[Value::Nil], 2).unwrap_err();
        assert_eq!(error.to_string(), "f() expected 2 args, got 1");
    }

    #[test]
    fn typed_accessors_report_mismatches() {
        let args = [Value::Number(1.0)];
        assert_eq!(number_arg("f", &args, 0).unwrap(), 1.0);

        let error = string_arg("f", &args, 0).unwrap_err();
        assert_eq!(error.to_string(), "f() expected arg 1 to be string, got number");
    }
}
