//! One-shot raw command execution.

use std::io::Write;
use std::process::ExitCode;

use birdsock::{Client, Connector};

use crate::cli::ExecArgs;
use crate::errors::AppError;
use crate::output::write_reply;

/// Sends the command built from `args` and prints its reply.
///
/// Exits with failure when the final message carries an error code.
pub(crate) fn run_exec<C, W>(
    client: &mut Client<C>,
    args: &ExecArgs,
    stdout: &mut W,
) -> Result<ExitCode, AppError>
where
    C: Connector,
    W: Write,
{
    let command = args.command();
    let reply = client.request(&command)?;
    if reply.is_empty() {
        return Err(AppError::EmptyReply { command });
    }
    write_reply(stdout, &reply, args.output)?;
    stdout.flush().map_err(AppError::WriteOutput)?;
    if reply.is_error() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
