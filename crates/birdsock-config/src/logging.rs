//! Formats for diagnostic lines written to stderr.

use clap::ValueEnum;
use strum::{Display, EnumString};

/// Layout of each diagnostic line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, ValueEnum)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One flattened JSON object per event.
    Json,
    /// Terse single-line text for terminals.
    #[default]
    Compact,
}

/// Error returned when `--log-format` names an unknown format.
pub type LogFormatParseError = strum::ParseError;
