//! Scripted stream doubles shared by the engine's unit tests.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::connection::Connector;

/// One scripted outcome of a `read` call.
pub(crate) enum ReadEvent {
    Data(Vec<u8>),
    Fail(io::ErrorKind),
}

/// Stream that replays scripted reads and records everything written to it.
///
/// Once the script is exhausted every read reports end of stream.
pub(crate) struct ScriptedStream {
    events: VecDeque<ReadEvent>,
    written: Arc<Mutex<Vec<u8>>>,
    fail_writes: Option<io::ErrorKind>,
    reads: Arc<AtomicUsize>,
    dropped: Arc<AtomicBool>,
}

/// Observer handles that outlive the stream they were taken from.
#[derive(Clone)]
pub(crate) struct StreamObserver {
    written: Arc<Mutex<Vec<u8>>>,
    reads: Arc<AtomicUsize>,
    dropped: Arc<AtomicBool>,
}

impl StreamObserver {
    pub(crate) fn written(&self) -> Vec<u8> {
        self.written.lock().expect("lock written bytes").clone()
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn is_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

impl ScriptedStream {
    pub(crate) fn new(events: impl IntoIterator<Item = ReadEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            written: Arc::default(),
            fail_writes: None,
            reads: Arc::default(),
            dropped: Arc::default(),
        }
    }

    /// Stream that yields each chunk as a separate read.
    pub(crate) fn chunks(chunks: &[&[u8]]) -> Self {
        Self::new(chunks.iter().map(|chunk| ReadEvent::Data(chunk.to_vec())))
    }

    pub(crate) fn failing_writes(mut self, kind: io::ErrorKind) -> Self {
        self.fail_writes = Some(kind);
        self
    }

    pub(crate) fn observer(&self) -> StreamObserver {
        StreamObserver {
            written: Arc::clone(&self.written),
            reads: Arc::clone(&self.reads),
            dropped: Arc::clone(&self.dropped),
        }
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.events.pop_front() {
            None => Ok(0),
            Some(ReadEvent::Fail(kind)) => Err(io::Error::from(kind)),
            Some(ReadEvent::Data(data)) => {
                let count = data.len().min(buf.len());
                buf[..count].copy_from_slice(&data[..count]);
                if count < data.len() {
                    self.events.push_front(ReadEvent::Data(data[count..].to_vec()));
                }
                Ok(count)
            }
        }
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(kind) = self.fail_writes {
            return Err(io::Error::from(kind));
        }
        self.written
            .lock()
            .expect("lock written bytes")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

/// Connector handing out pre-built streams in order.
///
/// Connecting after the queue is exhausted fails with `ConnectionRefused`.
pub(crate) struct QueueConnector<S> {
    streams: VecDeque<S>,
    connects: Arc<AtomicUsize>,
}

impl<S> QueueConnector<S> {
    pub(crate) fn new(streams: impl IntoIterator<Item = S>) -> Self {
        Self {
            streams: streams.into_iter().collect(),
            connects: Arc::default(),
        }
    }

    pub(crate) fn connect_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.connects)
    }
}

impl<S: Read + Write> Connector for QueueConnector<S> {
    type Stream = S;

    fn connect(&mut self) -> io::Result<S> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.streams
            .pop_front()
            .ok_or_else(|| io::Error::from(io::ErrorKind::ConnectionRefused))
    }

    fn endpoint(&self) -> &str {
        "scripted"
    }
}
