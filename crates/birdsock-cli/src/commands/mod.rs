//! Subcommand implementations.
//!
//! Each command drives a [`Client`] that is already connected and greeted,
//! and writes its results to the supplied output handle.

mod bench;
mod exec;
mod query;

use std::io::{BufRead, Write};
use std::process::ExitCode;

use birdsock::{Client, Connector};

pub(crate) use self::bench::run_bench;
pub(crate) use self::exec::run_exec;
pub(crate) use self::query::run_query;

use crate::cli::CliCommand;
use crate::errors::AppError;

const COMMANDS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::commands");

/// Runs `command` against `client`.
pub(crate) fn dispatch<C, R, W>(
    command: &CliCommand,
    client: &mut Client<C>,
    stdin: &mut R,
    stdout: &mut W,
) -> Result<ExitCode, AppError>
where
    C: Connector,
    R: BufRead,
    W: Write,
{
    match command {
        CliCommand::Bench(args) => run_bench(client, args, stdout).map(|_| ExitCode::SUCCESS),
        CliCommand::Query(args) => run_query(client, args, stdin, stdout).map(|()| ExitCode::SUCCESS),
        CliCommand::Exec(args) => run_exec(client, args, stdout),
    }
}
