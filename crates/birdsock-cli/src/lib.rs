//! Command-line runtime for the `birdsock` binary.
//!
//! The runtime parses arguments, installs diagnostics, connects to the BIRD
//! control socket, and hands the greeted client to the selected subcommand.
//! IO handles are injected so the whole flow can be driven from tests.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use birdsock::UnixClient;
use clap::Parser;
use clap::error::ErrorKind;
use tracing::info;

mod cli;
mod commands;
mod errors;
mod output;
mod settings;
mod telemetry;

use cli::Cli;
use errors::AppError;
use settings::ClientSettings;

const RUNTIME_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::runtime");

/// Runs the CLI with the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    match try_run(args, stdin, stdout) {
        Ok(exit_code) => exit_code,
        Err(AppError::CliUsage(error)) if is_informational(&error) => {
            let _ = write!(stdout, "{error}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            if let Some(hint) = error.hint() {
                let _ = writeln!(stderr, "hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn try_run<I, R, W>(args: I, stdin: &mut R, stdout: &mut W) -> Result<ExitCode, AppError>
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
{
    let cli = Cli::try_parse_from(args).map_err(AppError::CliUsage)?;
    telemetry::initialise(&cli.logging.log_filter, cli.logging.log_format)?;
    let settings = ClientSettings::from_args(&cli.connection)?;

    let mut client = UnixClient::connect_with(settings.endpoint().path(), settings.options())?;
    info!(
        target: RUNTIME_TARGET,
        endpoint = %settings.endpoint(),
        banner = %client.banner(),
        "connected to daemon"
    );
    commands::dispatch(&cli.command, &mut client, stdin, stdout)
}

fn is_informational(error: &clap::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}
