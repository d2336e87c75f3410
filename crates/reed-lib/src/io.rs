//! The `io` library: standard input and file access.

use std::io::{BufRead, Write};

use reed_eval::{NativeModule, RuntimeError, Value};

use crate::args::{call_error, expect_len, string_arg};

pub fn module() -> NativeModule {
    vec![
        ("input", input),
        ("readFile", read_file),
        ("writeFile", write_file),
        ("appendFile", append_file),
    ]
}

/// Reads one line from stdin, prompting first. The trailing newline is
/// stripped.
pub(crate) fn read_line(prompt: &str) -> Result<String, RuntimeError> {
    print!("{prompt}");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| call_error(format!("could not read from stdin: {e}")))?;

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }

    Ok(line)
}

fn input(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("input", args, 1)?;
    let prompt = string_arg("input", args, 0)?;
    Ok(Value::Str(read_line(prompt)?))
}

fn read_file(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("readFile", args, 1)?;
    let name = string_arg("readFile", args, 0)?;

    let contents = std::fs::read_to_string(name)
        .map_err(|_| call_error(format!("could not read file '{name}'")))?;
    Ok(Value::Str(contents))
}

fn write_file(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("writeFile", args, 2)?;
    let name = string_arg("writeFile", args, 0)?;
    let contents = string_arg("writeFile", args, 1)?;

    std::fs::write(name, contents)
        .map_err(|_| call_error(format!("could not write file '{name}'")))?;
    Ok(Value::Nil)
}

fn append_file(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("appendFile", args, 2)?;
    let name = string_arg("appendFile", args, 0)?;
    let contents = string_arg("appendFile", args, 1)?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(name)
        .map_err(|_| call_error(format!("could not open file '{name}'")))?;
    file.write_all(contents.as_bytes())
        .map_err(|_| call_error(format!("could not write file '{name}'")))?;
    Ok(Value::Nil)
}
