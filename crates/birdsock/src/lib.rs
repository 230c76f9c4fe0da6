//! Client engine for the BIRD routing daemon's control socket.
//!
//! BIRD answers commands on a local Unix domain socket with replies made of
//! coded lines. This crate owns the protocol engine behind any client of that
//! socket:
//!
//! - [`Accumulator`] buffers bytes from the stream and serves "at least N
//!   bytes" and "up to the next newline" requests.
//! - [`parser`] turns buffered lines into [`Message`]s and groups them into a
//!   [`Reply`] ending at the first final message.
//! - [`Connection`] performs the greeting handshake, writes commands, and
//!   rebuilds itself when the daemon resets the stream.
//! - [`Client`] is the façade callers use.
//!
//! Exchanges are strictly request/reply and blocking; one command may be in
//! flight per connection. An empty [`Reply`] always signals a failed exchange,
//! since the daemon terminates every reply with a final message.

pub mod accumulator;
mod client;
pub mod connection;
mod error;
pub mod parser;
mod reply;

#[cfg(test)]
mod test_support;

pub use self::accumulator::{Accumulator, DEFAULT_CHUNK_SIZE, Fill, FillStatus};
#[cfg(unix)]
pub use self::client::UnixClient;
pub use self::client::Client;
#[cfg(unix)]
pub use self::connection::UnixConnector;
pub use self::connection::{Connection, ConnectionOptions, Connector};
pub use self::error::{ClientError, ProtocolError};
pub use self::reply::{CodeClass, InvalidReplyCode, Message, Reply, ReplyCode};
