//! Entry point for the `dict` binary.
//!
//! Delegates to [`dict_cli::run`], which loads configuration, connects to the
//! configured DICT server and prints the result of one lookup.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    dict_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
