//! Connection lifecycle: handshake, command submission, and reset recovery.
//!
//! A [`Connection`] owns exactly one stream, wrapped in an [`Accumulator`],
//! and the [`Connector`] used to open it. Every fresh stream starts with the
//! daemon's greeting, which is read before the connection is handed out. When
//! the peer resets the stream mid-reply the connection rebuilds itself from
//! the connector and reports the lost reply as empty; resending the command is
//! left to the caller.

#[cfg(unix)]
mod transport;

use std::io::{self, Read, Write};
#[cfg(unix)]
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::accumulator::{Accumulator, DEFAULT_CHUNK_SIZE};
use crate::error::ClientError;
use crate::parser;
use crate::reply::Reply;

#[cfg(unix)]
pub use self::transport::UnixConnector;

const CONNECTION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::connection");

/// Source of fresh streams to the daemon.
///
/// A connection calls [`connect`](Self::connect) once when it is opened and
/// once per reconnect.
pub trait Connector {
    /// Stream type produced by this connector.
    type Stream: Read + Write;

    /// Opens a new stream to the daemon.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while opening or configuring the stream.
    fn connect(&mut self) -> io::Result<Self::Stream>;

    /// Human-readable description of the endpoint, used in diagnostics.
    fn endpoint(&self) -> &str;
}

/// Transport policy applied when opening connections.
///
/// Every timeout defaults to `None`, meaning socket operations block for as
/// long as the operating system lets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOptions {
    chunk_size: usize,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl ConnectionOptions {
    /// Sets the size of a single socket read.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Bounds how long opening the socket may take.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Bounds how long a single socket read may block.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Bounds how long a single socket write may block.
    #[must_use]
    pub const fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Size of a single socket read.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Connect timeout, if any.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Read timeout, if any.
    #[must_use]
    pub const fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// Write timeout, if any.
    #[must_use]
    pub const fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout
    }
}

/// Request/reply session with the daemon over one stream.
pub struct Connection<C: Connector> {
    connector: C,
    accumulator: Option<Accumulator<C::Stream>>,
    chunk_size: usize,
    greeting: Reply,
}

#[cfg(unix)]
impl Connection<UnixConnector> {
    /// Connects to the control socket at `path` with default options.
    ///
    /// # Errors
    ///
    /// Fails when the socket cannot be opened or the greeting cannot be read.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        Self::connect_with(path, ConnectionOptions::default())
    }

    /// Connects to the control socket at `path` using `options`.
    ///
    /// # Errors
    ///
    /// Fails when the socket cannot be opened or the greeting cannot be read.
    pub fn connect_with(
        path: impl AsRef<Path>,
        options: ConnectionOptions,
    ) -> Result<Self, ClientError> {
        Self::open(UnixConnector::new(path, options), options.chunk_size())
    }
}

impl<C: Connector> Connection<C> {
    /// Opens a stream from `connector` and reads the daemon's greeting.
    ///
    /// # Errors
    ///
    /// Fails when the connector cannot open a stream, when the greeting read
    /// fails, or when the daemon hangs up before greeting.
    pub fn open(mut connector: C, chunk_size: usize) -> Result<Self, ClientError> {
        let (accumulator, greeting) = handshake(&mut connector, chunk_size)?;
        Ok(Self {
            connector,
            accumulator: Some(accumulator),
            chunk_size,
            greeting,
        })
    }

    /// Writes `command` followed by a newline.
    ///
    /// A trailing newline already present in `command` is not duplicated.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Send`] when the write does not complete and
    /// [`ClientError::Disconnected`] when no stream is open. Failed writes are
    /// never retried.
    pub fn send(&mut self, command: &str) -> Result<(), ClientError> {
        let accumulator = self.accumulator.as_mut().ok_or(ClientError::Disconnected)?;
        let stream = accumulator.get_mut();
        stream
            .write_all(&frame_command(command))
            .and_then(|()| stream.flush())
            .map_err(|source| ClientError::Send {
                source: Arc::new(source),
            })?;
        debug!(
            target: CONNECTION_TARGET,
            endpoint = self.connector.endpoint(),
            command = command.trim_end(),
            "sent command"
        );
        Ok(())
    }

    /// Reads the next complete reply.
    ///
    /// An empty reply means the exchange failed: the stream ended, or the
    /// peer reset the connection and it has been re-established.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Receive`] for framing violations and read
    /// failures other than a reset, and the reconnect error when recovering
    /// from a reset fails. After a [`ClientError::Receive`] the stream is
    /// dropped along with any partly read reply, and later calls return
    /// [`ClientError::Disconnected`] until [`Connection::reconnect`] succeeds.
    pub fn receive_reply(&mut self) -> Result<Reply, ClientError> {
        let accumulator = self.accumulator.as_mut().ok_or(ClientError::Disconnected)?;
        match parser::read_reply(accumulator) {
            Ok(reply) => {
                debug!(
                    target: CONNECTION_TARGET,
                    endpoint = self.connector.endpoint(),
                    messages = reply.len(),
                    "received reply"
                );
                Ok(reply)
            }
            Err(error) if error.is_connection_reset() => {
                warn!(
                    target: CONNECTION_TARGET,
                    endpoint = self.connector.endpoint(),
                    error = %error,
                    "connection reset while reading reply; reconnecting"
                );
                self.reconnect()?;
                Ok(Reply::empty())
            }
            Err(source) => {
                warn!(
                    target: CONNECTION_TARGET,
                    endpoint = self.connector.endpoint(),
                    error = %source,
                    "discarding stream after failed reply read"
                );
                self.accumulator = None;
                Err(ClientError::Receive { source })
            }
        }
    }

    /// Sends `command` and reads its reply.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`send`](Self::send) and
    /// [`receive_reply`](Self::receive_reply).
    pub fn request(&mut self, command: &str) -> Result<Reply, ClientError> {
        self.send(command)?;
        self.receive_reply()
    }

    /// Replaces the stream with a fresh one and consumes its greeting.
    ///
    /// Buffered bytes are discarded and the old stream is closed before the
    /// new one is opened. On failure the connection is left disconnected.
    ///
    /// # Errors
    ///
    /// Fails when the connector cannot open a stream or the greeting cannot
    /// be read. The failure is not retried.
    pub fn reconnect(&mut self) -> Result<(), ClientError> {
        // Dropping the accumulator discards its buffer and closes the stream.
        self.accumulator = None;
        let (accumulator, greeting) = handshake(&mut self.connector, self.chunk_size)?;
        self.accumulator = Some(accumulator);
        info!(
            target: CONNECTION_TARGET,
            endpoint = self.connector.endpoint(),
            greeting_messages = greeting.len(),
            "reconnected to daemon"
        );
        Ok(())
    }

    /// Returns `true` while a stream is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.accumulator.is_some()
    }

    /// Greeting read when the connection was opened.
    #[must_use]
    pub const fn greeting(&self) -> &Reply {
        &self.greeting
    }

    /// Borrows the connector.
    #[must_use]
    pub const fn connector(&self) -> &C {
        &self.connector
    }
}

fn handshake<C: Connector>(
    connector: &mut C,
    chunk_size: usize,
) -> Result<(Accumulator<C::Stream>, Reply), ClientError> {
    let stream = connector
        .connect()
        .map_err(|source| ClientError::Connect {
            endpoint: connector.endpoint().to_owned(),
            source: Arc::new(source),
        })?;
    let mut accumulator = Accumulator::with_chunk_size(stream, chunk_size);
    let greeting =
        parser::read_reply(&mut accumulator).map_err(|source| ClientError::Handshake {
            endpoint: connector.endpoint().to_owned(),
            source,
        })?;
    if greeting.is_empty() {
        return Err(ClientError::MissingGreeting {
            endpoint: connector.endpoint().to_owned(),
        });
    }
    debug!(
        target: CONNECTION_TARGET,
        endpoint = connector.endpoint(),
        banner = %greeting
            .messages()
            .first()
            .map(|message| message.text_lossy())
            .unwrap_or_default(),
        "daemon greeting received"
    );
    Ok((accumulator, greeting))
}

fn frame_command(command: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(command.len() + 1);
    payload.extend_from_slice(command.as_bytes());
    if !command.ends_with('\n') {
        payload.push(b'\n');
    }
    payload
}
