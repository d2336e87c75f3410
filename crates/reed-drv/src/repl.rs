//! Interactive terminal mode.
//!
//! Reads statements line by line, holding submission while braces are
//! unbalanced so block statements can span lines. The environment persists
//! across submissions; errors print without ending the session.

use std::io::{BufRead, Write};
use std::process::ExitCode;

use colored::Colorize;

use reed_eval::Interpreter;

pub fn session() -> ExitCode {
    println!("type 'exit' to end the session");

    let mut interp = Interpreter::new();
    reed_lib::install(&mut interp);

    let stdin = std::io::stdin();
    let mut pending = String::new();
    let mut open_blocks = 0i32;
    let mut line_no = 1u32;

    loop {
        print!("{line_no} : {}", "    ".repeat(open_blocks.max(0) as usize));
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        if pending.is_empty() && line.trim() == "exit" {
            break;
        }

        open_blocks += line.matches('{').count() as i32;
        open_blocks -= line.matches('}').count() as i32;
        pending.push_str(&line);

        if open_blocks <= 0 {
            match interp.interpret("repl", &pending) {
                Ok(()) => {}
                Err(error) if error.is_exit() => break,
                Err(error) => eprintln!("{}", error.to_string().red()),
            }

            pending.clear();
            open_blocks = 0;
        }

        line_no += 1;
    }

    println!("session ended");
    ExitCode::SUCCESS
}
