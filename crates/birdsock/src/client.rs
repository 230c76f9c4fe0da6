//! Caller-facing client façade.

use std::borrow::Cow;
#[cfg(unix)]
use std::path::Path;

use crate::connection::{Connection, Connector};
#[cfg(unix)]
use crate::connection::{ConnectionOptions, UnixConnector};
use crate::error::ClientError;
use crate::reply::Reply;

/// Client bound to a Unix domain control socket.
#[cfg(unix)]
pub type UnixClient = Client<UnixConnector>;

/// Sends commands to the daemon and returns parsed replies.
///
/// One command may be in flight at a time. Use one client per thread when
/// querying concurrently.
///
/// # Example
///
/// ```rust,no_run
/// use birdsock::UnixClient;
///
/// # fn main() -> Result<(), birdsock::ClientError> {
/// let mut client = UnixClient::connect("/var/run/bird/bird.ctl")?;
/// println!("connected to {}", client.banner());
/// let reply = client.request("show status")?;
/// for (code, text, is_final) in reply.triples() {
///     println!("{code} {} {is_final}", String::from_utf8_lossy(text));
/// }
/// # Ok(())
/// # }
/// ```
pub struct Client<C: Connector> {
    connection: Connection<C>,
}

#[cfg(unix)]
impl Client<UnixConnector> {
    /// Connects to the control socket at `path` and reads its greeting.
    ///
    /// # Errors
    ///
    /// Fails when the socket cannot be opened or the greeting cannot be read.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        Connection::connect(path).map(Self::from_connection)
    }

    /// Connects using explicit transport options.
    ///
    /// # Errors
    ///
    /// Fails when the socket cannot be opened or the greeting cannot be read.
    pub fn connect_with(
        path: impl AsRef<Path>,
        options: ConnectionOptions,
    ) -> Result<Self, ClientError> {
        Connection::connect_with(path, options).map(Self::from_connection)
    }
}

impl<C: Connector> Client<C> {
    /// Wraps an established connection.
    #[must_use]
    pub const fn from_connection(connection: Connection<C>) -> Self {
        Self { connection }
    }

    /// Writes one command; see [`Connection::send`].
    ///
    /// # Errors
    ///
    /// Returns the transport error when the write does not complete.
    pub fn send(&mut self, command: &str) -> Result<(), ClientError> {
        self.connection.send(command)
    }

    /// Reads the next reply; see [`Connection::receive_reply`].
    ///
    /// # Errors
    ///
    /// Returns framing, read, and reconnect failures.
    pub fn receive_reply(&mut self) -> Result<Reply, ClientError> {
        self.connection.receive_reply()
    }

    /// Sends `command` and reads its reply.
    ///
    /// An empty reply means the exchange was lost; whether to resend is up to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns send, framing, read, and reconnect failures.
    pub fn request(&mut self, command: &str) -> Result<Reply, ClientError> {
        self.connection.request(command)
    }

    /// Re-establishes the connection; see [`Connection::reconnect`].
    ///
    /// # Errors
    ///
    /// Returns the connect or handshake failure.
    pub fn reconnect(&mut self) -> Result<(), ClientError> {
        self.connection.reconnect()
    }

    /// Greeting the daemon sent when the client connected.
    #[must_use]
    pub const fn greeting(&self) -> &Reply {
        self.connection.greeting()
    }

    /// Text of the greeting's first message, such as `BIRD 2.0.8 ready.`.
    #[must_use]
    pub fn banner(&self) -> Cow<'_, str> {
        self.greeting()
            .messages()
            .first()
            .map(|message| message.text_lossy())
            .unwrap_or_default()
    }

    /// Returns `true` while a stream is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Endpoint description used in diagnostics.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.connection.connector().endpoint()
    }

    /// Unwraps the underlying connection.
    #[must_use]
    pub fn into_connection(self) -> Connection<C> {
        self.connection
    }
}
