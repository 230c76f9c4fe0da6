//! Unix domain socket transport.

use std::io;
use std::os::fd::OwnedFd;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use socket2::{Domain, SockAddr, Socket, Type};

use super::{ConnectionOptions, Connector};

/// Opens stream sockets to a daemon control socket on the local filesystem.
#[derive(Debug, Clone)]
pub struct UnixConnector {
    path: PathBuf,
    endpoint: String,
    options: ConnectionOptions,
}

impl UnixConnector {
    /// Targets the socket at `socket_path`, applying the timeouts in `options`.
    #[must_use]
    pub fn new(socket_path: impl AsRef<Path>, options: ConnectionOptions) -> Self {
        let path = socket_path.as_ref().to_path_buf();
        let endpoint = path.display().to_string();
        Self {
            path,
            endpoint,
            options,
        }
    }

    /// Socket path on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector for UnixConnector {
    type Stream = UnixStream;

    fn connect(&mut self) -> io::Result<UnixStream> {
        let stream = match self.options.connect_timeout() {
            Some(timeout) => connect_with_timeout(&self.path, timeout)?,
            None => UnixStream::connect(&self.path)?,
        };
        stream.set_read_timeout(self.options.read_timeout())?;
        stream.set_write_timeout(self.options.write_timeout())?;
        Ok(stream)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn connect_with_timeout(path: &Path, timeout: Duration) -> io::Result<UnixStream> {
    let socket = Socket::new(Domain::UNIX, Type::STREAM, None)?;
    let address = SockAddr::unix(path)?;
    socket.connect_timeout(&address, timeout)?;
    Ok(UnixStream::from(OwnedFd::from(socket)))
}
