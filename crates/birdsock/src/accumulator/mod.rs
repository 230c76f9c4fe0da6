//! Incremental read buffer over a streaming socket.
//!
//! The [`Accumulator`] is the only place bytes enter the engine. It answers
//! two questions for the reply parser, "are at least N bytes buffered?" and
//! "where is the next delimiter?", reading fixed-size chunks from the stream
//! only when the buffered bytes cannot answer them. Bytes leave the buffer from
//! the front, and only through [`Accumulator::advance`].

use std::io::{self, Read};

/// Size of a single socket read when no other size is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Outcome of [`Accumulator::ensure_at_least`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    /// The buffer now holds at least the requested number of bytes.
    Satisfied,
    /// The stream ended before the requested number of bytes arrived.
    EndOfStream,
}

/// Bytes read by a fill request and whether its target was met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// Number of bytes newly read from the stream by this request.
    pub read: usize,
    /// Whether the size target was met.
    pub status: FillStatus,
}

impl Fill {
    /// Returns `true` when the size target was met.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.status == FillStatus::Satisfied
    }
}

/// Growable FIFO byte buffer that owns the stream it reads from.
#[derive(Debug)]
pub struct Accumulator<R> {
    stream: R,
    buffer: Vec<u8>,
    chunk: Box<[u8]>,
}

impl<R: Read> Accumulator<R> {
    /// Wraps a stream using [`DEFAULT_CHUNK_SIZE`] reads.
    #[must_use]
    pub fn new(stream: R) -> Self {
        Self::with_chunk_size(stream, DEFAULT_CHUNK_SIZE)
    }

    /// Wraps a stream using reads of `chunk_size` bytes.
    ///
    /// A chunk size of zero is treated as one so reads always make progress.
    #[must_use]
    pub fn with_chunk_size(stream: R, chunk_size: usize) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            chunk: vec![0; chunk_size.max(1)].into_boxed_slice(),
        }
    }

    /// Reads until at least `target` bytes are buffered or the stream ends.
    ///
    /// Returns immediately, without reading, when the buffer already holds
    /// enough bytes. Blocks for as long as the underlying stream blocks.
    ///
    /// # Errors
    ///
    /// Returns any read error other than [`io::ErrorKind::Interrupted`].
    pub fn ensure_at_least(&mut self, target: usize) -> io::Result<Fill> {
        let mut read = 0;
        while self.buffer.len() < target {
            let bytes_read = self.read_chunk()?;
            if bytes_read == 0 {
                return Ok(Fill {
                    read,
                    status: FillStatus::EndOfStream,
                });
            }
            read += bytes_read;
        }
        Ok(Fill {
            read,
            status: FillStatus::Satisfied,
        })
    }

    /// Locates `delimiter`, reading more chunks until it appears.
    ///
    /// Returns the offset of the delimiter from the front of the buffer, or
    /// `None` if the stream ended first. Nothing is removed from the buffer;
    /// callers inspect the line and then [`advance`](Self::advance) past it.
    ///
    /// # Errors
    ///
    /// Returns any read error other than [`io::ErrorKind::Interrupted`].
    pub fn fill_until(&mut self, delimiter: u8) -> io::Result<Option<usize>> {
        let mut searched = 0;
        loop {
            let found = self
                .buffer
                .get(searched..)
                .and_then(|tail| tail.iter().position(|byte| *byte == delimiter));
            if let Some(offset) = found {
                return Ok(Some(searched + offset));
            }
            searched = self.buffer.len();
            if self.read_chunk()? == 0 {
                return Ok(None);
            }
        }
    }

    fn read_chunk(&mut self) -> io::Result<usize> {
        loop {
            match self.stream.read(&mut self.chunk) {
                Ok(read) => {
                    let received = self.chunk.get(..read).unwrap_or_default();
                    self.buffer.extend_from_slice(received);
                    return Ok(read);
                }
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => return Err(error),
            }
        }
    }
}

impl<R> Accumulator<R> {
    /// Drops the first `count` buffered bytes.
    ///
    /// Counts beyond the buffered length empty the buffer.
    pub fn advance(&mut self, count: usize) {
        let consumed = count.min(self.buffer.len());
        self.buffer.drain(..consumed);
    }

    /// Read-only view of the bytes received but not yet consumed.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of buffered bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` when no bytes are buffered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discards every buffered byte.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Size of a single stream read.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk.len()
    }

    /// Borrows the underlying stream.
    #[must_use]
    pub const fn get_ref(&self) -> &R {
        &self.stream
    }

    /// Mutably borrows the underlying stream, typically to write a command.
    ///
    /// Reading from the stream directly bypasses the buffer and will
    /// desynchronise the parser.
    pub const fn get_mut(&mut self) -> &mut R {
        &mut self.stream
    }

    /// Returns the underlying stream, discarding buffered bytes.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.stream
    }
}

#[cfg(test)]
mod tests;
