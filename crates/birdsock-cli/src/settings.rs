//! Resolution of connection flags into engine settings.

use std::time::Duration;

use birdsock::ConnectionOptions;
use birdsock_config::SocketEndpoint;
use thiserror::Error;

use crate::cli::ConnectionArgs;

/// Errors raised while validating connection flags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum SettingsError {
    #[error("--chunk-size must be greater than zero")]
    ZeroChunkSize,
    #[error("--{flag} must be greater than zero")]
    ZeroTimeout { flag: &'static str },
}

/// Validated socket location and transport policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClientSettings {
    endpoint: SocketEndpoint,
    options: ConnectionOptions,
}

impl ClientSettings {
    pub(crate) fn from_args(args: &ConnectionArgs) -> Result<Self, SettingsError> {
        if args.chunk_size == 0 {
            return Err(SettingsError::ZeroChunkSize);
        }
        let options = ConnectionOptions::default()
            .with_chunk_size(args.chunk_size)
            .with_connect_timeout(timeout("connect-timeout-ms", args.connect_timeout_ms)?)
            .with_read_timeout(timeout("read-timeout-ms", args.read_timeout_ms)?)
            .with_write_timeout(timeout("write-timeout-ms", args.write_timeout_ms)?);
        Ok(Self {
            endpoint: SocketEndpoint::resolve(args.socket.clone(), args.family),
            options,
        })
    }

    pub(crate) const fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }

    pub(crate) const fn options(&self) -> ConnectionOptions {
        self.options
    }
}

// Zero durations are rejected by the socket layer, so they are caught here.
fn timeout(flag: &'static str, millis: Option<u64>) -> Result<Option<Duration>, SettingsError> {
    match millis {
        Some(0) => Err(SettingsError::ZeroTimeout { flag }),
        other => Ok(other.map(Duration::from_millis)),
    }
}

#[cfg(test)]
mod tests {
    use birdsock_config::{AddressFamily, DEFAULT_V6_SOCKET};
    use rstest::rstest;

    use super::*;

    fn args() -> ConnectionArgs {
        ConnectionArgs {
            socket: None,
            family: AddressFamily::V4,
            chunk_size: 4096,
            read_timeout_ms: None,
            write_timeout_ms: None,
            connect_timeout_ms: None,
        }
    }

    #[test]
    fn family_selects_the_canonical_socket() {
        let settings = ClientSettings::from_args(&ConnectionArgs {
            family: AddressFamily::V6,
            ..args()
        })
        .expect("valid settings");

        assert_eq!(settings.endpoint().path().as_str(), DEFAULT_V6_SOCKET);
    }

    #[test]
    fn explicit_socket_wins_over_family() {
        let settings = ClientSettings::from_args(&ConnectionArgs {
            socket: Some(SocketEndpoint::unix("/tmp/bird.ctl")),
            family: AddressFamily::V6,
            ..args()
        })
        .expect("valid settings");

        assert_eq!(settings.endpoint().path().as_str(), "/tmp/bird.ctl");
    }

    #[test]
    fn timeouts_are_carried_into_connection_options() {
        let settings = ClientSettings::from_args(&ConnectionArgs {
            chunk_size: 64,
            read_timeout_ms: Some(1500),
            connect_timeout_ms: Some(200),
            ..args()
        })
        .expect("valid settings");

        let options = settings.options();
        assert_eq!(options.chunk_size(), 64);
        assert_eq!(options.read_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(options.connect_timeout(), Some(Duration::from_millis(200)));
        assert_eq!(options.write_timeout(), None);
    }

    #[rstest]
    #[case::chunk(ConnectionArgs { chunk_size: 0, ..args() }, SettingsError::ZeroChunkSize)]
    #[case::read(
        ConnectionArgs { read_timeout_ms: Some(0), ..args() },
        SettingsError::ZeroTimeout { flag: "read-timeout-ms" }
    )]
    #[case::write(
        ConnectionArgs { write_timeout_ms: Some(0), ..args() },
        SettingsError::ZeroTimeout { flag: "write-timeout-ms" }
    )]
    fn zero_values_are_rejected(#[case] input: ConnectionArgs, #[case] expected: SettingsError) {
        assert_eq!(ClientSettings::from_args(&input), Err(expected));
    }
}
