use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::family::AddressFamily;

const UNIX_SCHEME_PREFIX: &str = "unix://";

/// Location of a BIRD control socket.
///
/// Only Unix domain sockets are supported. The textual form accepts either a
/// bare filesystem path or a `unix://` URL, and displays as the latter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEndpoint {
    path: Utf8PathBuf,
}

impl SocketEndpoint {
    /// Builds an endpoint for the given socket path.
    #[must_use]
    pub fn unix(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the canonical endpoint for an address family.
    #[must_use]
    pub fn for_family(family: AddressFamily) -> Self {
        Self::unix(family.default_socket_path())
    }

    /// Picks the explicit endpoint when present, else the family default.
    #[must_use]
    pub fn resolve(explicit: Option<Self>, family: AddressFamily) -> Self {
        explicit.unwrap_or_else(|| Self::for_family(family))
    }

    /// Returns the socket path on disk.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl fmt::Display for SocketEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{UNIX_SCHEME_PREFIX}{}", self.path)
    }
}

impl FromStr for SocketEndpoint {
    type Err = SocketParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let path = match input.split_once("://") {
            Some(("unix", path)) => path,
            Some((scheme, _)) => return Err(SocketParseError::UnsupportedScheme(scheme.to_owned())),
            None => input,
        };
        if path.is_empty() {
            return Err(SocketParseError::MissingUnixPath(input.to_owned()));
        }
        Ok(Self::unix(path))
    }
}

/// Errors encountered while parsing a [`SocketEndpoint`] from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SocketParseError {
    /// Scheme was not recognised.
    #[error("unsupported socket scheme '{0}', only unix sockets are supported")]
    UnsupportedScheme(String),
    /// Unix socket path was absent.
    #[error("missing Unix socket path in '{0}'")]
    MissingUnixPath(String),
}
