//! The `std` library: the small convenience subset of `io` and `str` that
//! most scripts want without pulling in either.

use reed_eval::{NativeModule, RuntimeError, Value};

use crate::args::{expect_len, string_arg};
use crate::io::read_line;

pub fn module() -> NativeModule {
    vec![("input", input), ("toString", to_string)]
}

fn input(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("input", args, 1)?;
    let prompt = string_arg("input", args, 0)?;
    Ok(Value::Str(read_line(prompt)?))
}

fn to_string(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("toString", args, 1)?;
    Ok(Value::Str(args[0].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_string_formats_values() {
        assert_eq!(
            to_string(&[Value::Bool(true)]).unwrap(),
            Value::Str("true".into())
        );
        assert!(to_string(&[]).is_err());
    }
}
