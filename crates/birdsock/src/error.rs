//! Error types raised by the protocol engine.
//!
//! [`ProtocolError`] covers a single reply read: either the byte stream broke
//! the framing rules or the socket read failed. [`ClientError`] covers the
//! connection lifecycle around it. I/O errors are wrapped in `Arc` so both
//! types stay cheap to clone into diagnostics.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Failures while decoding one reply from the byte stream.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    /// The stream ended in the middle of a line.
    #[error("stream ended inside an unterminated reply line ({buffered} bytes buffered)")]
    UnterminatedLine {
        /// Bytes of the truncated line left in the buffer.
        buffered: usize,
    },
    /// A continuation line arrived before any coded message.
    #[error("continuation line received before any coded message")]
    OrphanContinuation,
    /// A coded line did not start with four ASCII digits.
    #[error("reply line starts with invalid code '{code}'")]
    InvalidCode {
        /// The offending bytes, escaped for display.
        code: String,
    },
    /// Reading from the socket failed.
    #[error("failed to read from daemon socket: {0}")]
    Io(#[source] Arc<io::Error>),
}

impl ProtocolError {
    pub(crate) fn io(error: io::Error) -> Self {
        Self::Io(Arc::new(error))
    }

    /// Returns `true` when the byte stream violated the line framing rules.
    #[must_use]
    pub const fn is_framing(&self) -> bool {
        !matches!(self, Self::Io(_))
    }

    /// Returns `true` when the peer reset the connection during the read.
    #[must_use]
    pub fn is_connection_reset(&self) -> bool {
        matches!(self, Self::Io(error) if error.kind() == io::ErrorKind::ConnectionReset)
    }
}

/// Failures while connecting to, or exchanging commands with, the daemon.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Opening the socket failed.
    #[error("failed to connect to daemon at {endpoint}: {source}")]
    Connect {
        /// Endpoint that was dialled.
        endpoint: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
    /// The greeting could not be read after connecting.
    #[error("failed to read greeting from daemon at {endpoint}: {source}")]
    Handshake {
        /// Endpoint that was dialled.
        endpoint: String,
        /// Why the greeting read failed.
        #[source]
        source: ProtocolError,
    },
    /// The daemon closed the connection before greeting the client.
    #[error("daemon at {endpoint} closed the connection before sending a greeting")]
    MissingGreeting {
        /// Endpoint that was dialled.
        endpoint: String,
    },
    /// Writing a command to the socket failed.
    #[error("failed to send command to daemon: {source}")]
    Send {
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
    /// Reading a reply failed for a reason other than a connection reset.
    #[error("failed to receive reply from daemon: {source}")]
    Receive {
        /// Why the reply read failed.
        #[source]
        source: ProtocolError,
    },
    /// A previous reconnect failed and no socket is open.
    #[error("not connected to the daemon; reconnect before sending commands")]
    Disconnected,
}

impl ClientError {
    /// Determines whether an error indicates the daemon is not running.
    ///
    /// Returns true for connection-refused, socket-not-found, and
    /// address-unavailable errors, which mean nothing listens on the socket.
    #[must_use]
    pub fn is_daemon_not_running(&self) -> bool {
        match self {
            Self::Connect { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::NotFound
                    | io::ErrorKind::AddrNotAvailable
            ),
            _ => false,
        }
    }

    /// Returns `true` when a read hit a framing violation.
    #[must_use]
    pub const fn is_framing(&self) -> bool {
        match self {
            Self::Receive { source } | Self::Handshake { source, .. } => source.is_framing(),
            _ => false,
        }
    }
}
