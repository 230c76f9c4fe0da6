//! Reply parser for the daemon's coded line format.
//!
//! Each raw line is either a coded line, `<4 digits><status><text>\n`, or a
//! continuation line, ` <text>\n`. A space status byte marks the final
//! message of a reply. Continuation lines extend the previous message's text.
//! See <https://bird.network.cz/?get_doc&v=20&f=prog-2.html#ss2.9>.

use std::io::Read;

use crate::accumulator::Accumulator;
use crate::error::ProtocolError;
use crate::reply::{Message, Reply, ReplyCode};

const CODE_LEN: usize = 4;
const HEADER_LEN: usize = CODE_LEN + 1;
const LINE_END: u8 = b'\n';
const CONTINUATION: u8 = b' ';
const FINAL_STATUS: u8 = b' ';

/// What a single [`read_line`] call contributed to the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A coded line started a new message.
    Started {
        /// Whether the new message terminates the reply.
        is_final: bool,
    },
    /// A continuation line was appended to the previous message.
    Continued,
    /// The stream ended before another line header arrived.
    EndOfStream,
}

/// Reads one raw line and folds it into `messages`.
///
/// # Errors
///
/// Returns a framing error when the line never terminates, when a
/// continuation arrives with no message to extend, or when a coded line has a
/// malformed code. Socket read failures are returned as
/// [`ProtocolError::Io`].
pub fn read_line<R: Read>(
    accumulator: &mut Accumulator<R>,
    messages: &mut Vec<Message>,
) -> Result<Step, ProtocolError> {
    let fill = accumulator
        .ensure_at_least(HEADER_LEN)
        .map_err(ProtocolError::io)?;
    if !fill.is_satisfied() {
        return Ok(Step::EndOfStream);
    }

    if accumulator.buffered().first() == Some(&CONTINUATION) {
        let end = line_end(accumulator)?;
        let Some(previous) = messages.last_mut() else {
            accumulator.advance(end + 1);
            return Err(ProtocolError::OrphanContinuation);
        };
        previous.append_continuation(accumulator.buffered().get(1..end).unwrap_or_default());
        accumulator.advance(end + 1);
        return Ok(Step::Continued);
    }

    let code = match parse_code(accumulator.buffered()) {
        Ok(code) => code,
        Err(error) => {
            discard_buffered_line(accumulator);
            return Err(error);
        }
    };
    let is_final = accumulator.buffered().get(CODE_LEN) == Some(&FINAL_STATUS);
    let end = line_end(accumulator)?;
    let text = accumulator
        .buffered()
        .get(HEADER_LEN..end)
        .unwrap_or_default()
        .to_vec();
    messages.push(Message::new(code, text, is_final));
    accumulator.advance(end + 1);
    Ok(Step::Started { is_final })
}

/// Reads lines until a final message arrives.
///
/// Returns an empty [`Reply`] when the stream ends first; messages gathered
/// before that point are discarded.
///
/// # Errors
///
/// Propagates every error from [`read_line`]. A framing error abandons the
/// partial reply; a rejected line that was fully buffered is consumed with
/// it.
pub fn read_reply<R: Read>(accumulator: &mut Accumulator<R>) -> Result<Reply, ProtocolError> {
    let mut messages = Vec::new();
    loop {
        match read_line(accumulator, &mut messages)? {
            Step::Started { is_final: true } => return Ok(Reply::from(messages)),
            Step::Started { is_final: false } | Step::Continued => {}
            Step::EndOfStream => return Ok(Reply::empty()),
        }
    }
}

fn line_end<R: Read>(accumulator: &mut Accumulator<R>) -> Result<usize, ProtocolError> {
    accumulator
        .fill_until(LINE_END)
        .map_err(ProtocolError::io)?
        .ok_or_else(|| ProtocolError::UnterminatedLine {
            buffered: accumulator.len(),
        })
}

/// Drops the current line if its delimiter is already buffered.
fn discard_buffered_line<R: Read>(accumulator: &mut Accumulator<R>) {
    if let Some(end) = accumulator
        .buffered()
        .iter()
        .position(|byte| *byte == LINE_END)
    {
        accumulator.advance(end + 1);
    }
}

fn parse_code(buffered: &[u8]) -> Result<ReplyCode, ProtocolError> {
    let raw = buffered.get(..CODE_LEN).unwrap_or_default();
    <[u8; CODE_LEN]>::try_from(raw)
        .ok()
        .and_then(ReplyCode::from_bytes)
        .ok_or_else(|| ProtocolError::InvalidCode {
            code: raw.escape_ascii().to_string(),
        })
}
