//! Entry point for the `mirrorpack` binary.
//!
//! Delegates to [`mirrorpack_cli::run`], which loads configuration, parses
//! the command line and runs one build-time transform.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    mirrorpack_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
