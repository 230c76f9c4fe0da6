use camino::Utf8Path;
use clap::ValueEnum;
use strum::{Display, EnumString};

use crate::defaults::{DEFAULT_V4_SOCKET, DEFAULT_V6_SOCKET};

/// Address family served by a BIRD instance.
///
/// BIRD 1.x runs one daemon per family, each with its own control socket, so
/// the family doubles as a selector for the socket path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, ValueEnum)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AddressFamily {
    /// IPv4 routes, served by `bird`.
    V4,
    /// IPv6 routes, served by `bird6`.
    V6,
}

impl AddressFamily {
    /// Returns the canonical control socket path for this family.
    #[must_use]
    pub fn default_socket_path(self) -> &'static Utf8Path {
        match self {
            Self::V4 => Utf8Path::new(DEFAULT_V4_SOCKET),
            Self::V6 => Utf8Path::new(DEFAULT_V6_SOCKET),
        }
    }
}

/// Errors encountered while parsing an [`AddressFamily`] from text.
pub type AddressFamilyParseError = strum::ParseError;
