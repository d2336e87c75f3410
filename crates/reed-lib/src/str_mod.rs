//! The `str` library: string conversions and manipulation.

use reed_eval::{NativeModule, RuntimeError, Value};

use crate::args::{call_error, expect_len, string_arg};

pub fn module() -> NativeModule {
    vec![
        ("toString", to_string),
        ("lower", lower),
        ("upper", upper),
        ("capital", capital),
        ("split", split),
        ("replace", replace),
        ("toNumber", to_number),
    ]
}

/// Formats any value the way `print` would.
fn to_string(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("toString", args, 1)?;
    Ok(Value::Str(args[0].to_string()))
}

fn lower(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("lower", args, 1)?;
    Ok(Value::Str(string_arg("lower", args, 0)?.to_lowercase()))
}

fn upper(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("upper", args, 1)?;
    Ok(Value::Str(string_arg("upper", args, 0)?.to_uppercase()))
}

/// Upper-cases the first letter of every whitespace-separated word.
fn capital(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("capital", args, 1)?;
    let text = string_arg("capital", args, 0)?;

    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            result.push(ch);
        } else if at_word_start {
            at_word_start = false;
            result.extend(ch.to_uppercase());
        } else {
            result.push(ch);
        }
    }

    Ok(Value::Str(result))
}

/// Splits a string on a separator into an array of strings. An empty
/// separator splits into single characters.
fn split(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("split", args, 2)?;
    let text = string_arg("split", args, 0)?;
    let separator = string_arg("split", args, 1)?;

    let parts: Vec<Value> = if separator.is_empty() {
        text.chars().map(|c| Value::Str(c.to_string())).collect()
    } else {
        text.split(separator)
            .map(|part| Value::Str(part.to_string()))
            .collect()
    };

    Ok(Value::array(parts))
}

fn replace(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("replace", args, 3)?;
    let text = string_arg("replace", args, 0)?;
    let old = string_arg("replace", args, 1)?;
    let new = string_arg("replace", args, 2)?;

    if old.is_empty() {
        return Ok(Value::Str(text.to_string()));
    }
    Ok(Value::Str(text.replace(old, new)))
}

fn to_number(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("toNumber", args, 1)?;
    let text = string_arg("toNumber", args, 0)?;

    text.trim()
        .parse::<f64>()
        .map(Value::Number)
        .map_err(|_| call_error("string could not be converted to number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::Str(text.into())
    }

    #[test]
    fn case_conversions() {
        assert_eq!(lower(&[s("HeLLo")]).unwrap(), s("hello"));
        assert_eq!(upper(&[s("hello")]).unwrap(), s("HELLO"));
        assert_eq!(capital(&[s("hello wide world")]).unwrap(), s("Hello Wide World"));
        assert_eq!(capital(&[s("")]).unwrap(), s(""));
    }

    #[test]
    fn to_string_formats_like_print() {
        assert_eq!(to_string(&[Value::Number(3.0)]).unwrap(), s("3"));
        assert_eq!(to_string(&[Value::Nil]).unwrap(), s("nil"));
        assert_eq!(
            to_string(&[Value::array(vec![Value::Number(1.0)])]).unwrap(),
            s("[1]")
        );
    }

    #[test]
    fn split_on_separator_and_empty() {
        assert_eq!(
            split(&[s("a,b,c"), s(",")]).unwrap(),
            Value::array(vec![s("a"), s("b"), s("c")])
        );
        assert_eq!(
            split(&[s("ab"), s("")]).unwrap(),
            Value::array(vec![s("a"), s("b")])
        );
    }

    #[test]
    fn replace_all_occurrences() {
        assert_eq!(replace(&[s("a-b-c"), s("-"), s("+")]).unwrap(), s("a+b+c"));
        assert_eq!(replace(&[s("abc"), s(""), s("+")]).unwrap(), s("abc"));
    }

    #[test]
    fn number_parsing() {
        assert_eq!(to_number(&[s("3.5")]).unwrap(), Value::Number(3.5));
        assert_eq!(to_number(&[s(" 42 ")]).unwrap(), Value::Number(42.0));
        let error = to_number(&[s("not a number")]).unwrap_err();
        assert_eq!(error.to_string(), "string could not be converted to number");
    }
}
