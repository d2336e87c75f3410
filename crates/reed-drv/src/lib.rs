//! reed-drv - Command-line driver for the Reed interpreter.
//!
//! The driver owns everything outside the core: flag parsing, locating the
//! script, wiring the standard library into a fresh interpreter, printing
//! errors (red on a colour terminal, with the call stack behind `-f`), and
//! the interactive terminal mode used when no file is given.

mod repl;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reed_eval::Interpreter;

/// The Reed scripting language interpreter.
///
/// Runs a `.reed` script, or starts an interactive session when no file is
/// given.
#[derive(Parser, Debug)]
#[command(name = "reed")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for the Reed scripting language", long_about = None)]
pub struct Cli {
    /// Script file to run (the .reed suffix may be omitted)
    pub file: Option<String>,

    /// Print the call stack when a runtime error surfaces
    #[arg(short = 'f', long = "call-stack")]
    pub call_stack: bool,

    /// Dump the global environment after the script finishes
    #[arg(short = 'e', long = "dump-env")]
    pub dump_env: bool,
}

/// Entry point used by the `reed` binary.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match &cli.file {
        Some(file) => run_script(file, &cli),
        None => repl::session(),
    }
}

fn run_script(file: &str, cli: &Cli) -> ExitCode {
    let name = match enter_script_dir(file) {
        Ok(name) => name,
        Err(error) => {
            eprintln!("{}", error.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    let mut interp = Interpreter::new();
    reed_lib::install(&mut interp);

    tracing::debug!(script = %name, "running script");
    match interp.run_file(&name) {
        Ok(env) => {
            if cli.dump_env {
                for (binding, value) in env.bindings() {
                    println!("{binding} = {value}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(error) if error.is_exit() => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", error.to_string().red());
            if cli.call_stack {
                if let Some(trace) = interp.call_trace() {
                    eprintln!("{trace}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Moves into the script's directory so relative imports resolve against it,
/// returning the bare file name to run. A missing `.reed` suffix is added.
fn enter_script_dir(file: &str) -> anyhow::Result<String> {
    let mut path = file.to_string();
    if !path.ends_with(".reed") {
        path.push_str(".reed");
    }

    let path = Path::new(&path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::env::set_current_dir(parent)
                .with_context(|| format!("cannot open directory '{}'", parent.display()))?;
        }
    }

    let name = path
        .file_name()
        .with_context(|| format!("invalid script path '{file}'"))?;
    Ok(name.to_string_lossy().into_owned())
}
