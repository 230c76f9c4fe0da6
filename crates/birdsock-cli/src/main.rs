//! Binary entrypoint for `birdsock`.
//!
//! All behaviour lives in [`birdsock_cli::run`]; this wrapper only locks the
//! process's standard streams.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    birdsock_cli::run(std::env::args_os(), &mut stdin, &mut stdout, &mut stderr)
}
