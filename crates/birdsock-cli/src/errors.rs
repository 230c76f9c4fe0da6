//! Error type reported by the CLI runtime.

use std::io;

use birdsock::ClientError;
use thiserror::Error;

use crate::settings::SettingsError;
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to read prefixes from stdin: {0}")]
    ReadInput(io::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
    #[error("failed to serialise reply message: {0}")]
    SerialiseMessage(serde_json::Error),
    #[error("no reply for '{command}' after {attempts} attempts")]
    AttemptsExhausted { command: String, attempts: u32 },
    #[error("daemon returned an empty reply to '{command}'")]
    EmptyReply { command: String },
}

impl AppError {
    /// Hints appended after the error when the daemon looks unreachable.
    pub(crate) fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Client(error) if error.is_daemon_not_running() => {
                Some("is the BIRD daemon running? use --socket or --family to pick its socket")
            }
            _ => None,
        }
    }
}
