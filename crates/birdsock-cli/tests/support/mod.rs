//! Fake BIRD daemon for exercising the binary over a real Unix socket.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

/// Greeting sent on every accepted connection.
pub const GREETING: &[u8] = b"0001 BIRD 2.0.8 ready.\n";

/// Daemon answering commands from a fixed script on one connection.
///
/// Every received command line is recorded. The connection is closed once
/// the script is exhausted or the client hangs up.
pub struct FakeBird {
    _dir: TempDir,
    socket: PathBuf,
    commands: Arc<Mutex<Vec<String>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeBird {
    pub fn spawn(responses: Vec<&'static [u8]>) -> Result<Self> {
        let dir = TempDir::new().context("create socket directory")?;
        let socket = dir.path().join("bird.ctl");
        let listener = UnixListener::bind(&socket).context("bind fake daemon")?;
        let commands = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&commands);
        let handle = thread::spawn(move || serve(&listener, &responses, &recorded));
        Ok(Self {
            _dir: dir,
            socket,
            commands,
            handle: Some(handle),
        })
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Joins the daemon thread and returns the commands it received.
    pub fn finish(mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake daemon thread panicked"))??;
        }
        let commands = self
            .commands
            .lock()
            .map_err(|error| anyhow!("lock commands: {error}"))?;
        Ok(commands.clone())
    }
}

fn serve(
    listener: &UnixListener,
    responses: &[&[u8]],
    commands: &Mutex<Vec<String>>,
) -> Result<()> {
    let (mut stream, _) = listener.accept().context("accept client")?;
    stream.write_all(GREETING).context("write greeting")?;
    let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
    for response in responses {
        let mut line = String::new();
        if reader.read_line(&mut line).context("read command")? == 0 {
            return Ok(());
        }
        commands
            .lock()
            .map_err(|error| anyhow!("lock commands: {error}"))?
            .push(line);
        stream.write_all(response).context("write response")?;
    }
    Ok(())
}
