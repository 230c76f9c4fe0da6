//! Structured replies decoded from the daemon's coded line format.
//!
//! A [`Reply`] is the ordered list of [`Message`]s the daemon sends for one
//! command. Each message carries a four digit [`ReplyCode`]; the leading digit
//! selects a [`CodeClass`] following BIRD's numbering convention.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Four ASCII digit code heading every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplyCode([u8; 4]);

impl ReplyCode {
    /// Command completed successfully.
    pub const OK: Self = Self(*b"0000");
    /// Greeting banner sent when a client connects.
    pub const WELCOME: Self = Self(*b"0001");
    /// Detailed route attributes, as produced by `show route ... all`.
    pub const ROUTE_DETAIL: Self = Self(*b"1012");

    /// Builds a code from raw bytes, rejecting anything but ASCII digits.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
        bytes
            .iter()
            .all(u8::is_ascii_digit)
            .then_some(Self(bytes))
    }

    /// Raw code bytes as sent on the wire.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Code as text, for example `"1012"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Numeric value of the code.
    #[must_use]
    pub fn value(self) -> u16 {
        self.0
            .iter()
            .fold(0, |value, digit| value * 10 + u16::from(digit - b'0'))
    }

    /// Category implied by the leading digit.
    #[must_use]
    pub const fn class(self) -> CodeClass {
        match self.0[0] {
            b'0' => CodeClass::Success,
            b'1' => CodeClass::TableEntry,
            b'2' => CodeClass::TableHeading,
            b'8' => CodeClass::RuntimeError,
            b'9' => CodeClass::ParseError,
            _ => CodeClass::Other,
        }
    }

    /// Returns `true` for runtime and parse error codes.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self.class(), CodeClass::RuntimeError | CodeClass::ParseError)
    }
}

impl fmt::Display for ReplyCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ReplyCode {
    type Err = InvalidReplyCode;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        <[u8; 4]>::try_from(input.as_bytes())
            .ok()
            .and_then(Self::from_bytes)
            .ok_or_else(|| InvalidReplyCode(input.to_owned()))
    }
}

/// Error returned when text is not a four digit reply code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a four digit reply code")]
pub struct InvalidReplyCode(String);

/// Category of a [`ReplyCode`], selected by its first digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeClass {
    /// `0xxx`: the action completed.
    Success,
    /// `1xxx`: a table entry.
    TableEntry,
    /// `2xxx`: a table heading.
    TableHeading,
    /// `8xxx`: a runtime error.
    RuntimeError,
    /// `9xxx`: a parse error in the command.
    ParseError,
    /// Any other leading digit.
    Other,
}

/// One coded unit of a reply, possibly spanning several protocol lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    code: ReplyCode,
    text: Vec<u8>,
    is_final: bool,
}

impl Message {
    /// Builds a message.
    #[must_use]
    pub fn new(code: ReplyCode, text: impl Into<Vec<u8>>, is_final: bool) -> Self {
        Self {
            code,
            text: text.into(),
            is_final,
        }
    }

    pub(crate) fn append_continuation(&mut self, line: &[u8]) {
        self.text.push(b'\n');
        self.text.extend_from_slice(line);
    }

    /// Code heading the message.
    #[must_use]
    pub const fn code(&self) -> ReplyCode {
        self.code
    }

    /// Raw message text; continuation lines are joined with `\n`.
    #[must_use]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Message text decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    /// Iterates over the message text one protocol line at a time.
    #[must_use]
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.text.split(|byte| *byte == b'\n')
    }

    /// Returns `true` for the message that terminates its reply.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.is_final
    }

    /// Returns `true` when the message carries an error code.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.code.is_error()
    }
}

/// Ordered messages answering one command.
///
/// A complete reply ends with exactly one final message. An empty reply never
/// comes from the daemon: it reports that the exchange failed, either because
/// the stream ended or because the connection was reset and re-established.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    messages: Vec<Message>,
}

impl Reply {
    /// Reply with no messages, signalling a failed exchange.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Messages in arrival order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterates over the messages in arrival order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Number of messages.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` when the exchange failed and no messages were kept.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The message that terminated the reply.
    #[must_use]
    pub fn final_message(&self) -> Option<&Message> {
        self.messages.last().filter(|message| message.is_final())
    }

    /// Returns `true` when the terminating message carries an error code.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.final_message().is_some_and(Message::is_error)
    }

    /// First message carrying `code`.
    #[must_use]
    pub fn find(&self, code: ReplyCode) -> Option<&Message> {
        self.messages.iter().find(|message| message.code() == code)
    }

    /// Iterates over `(code, text, is_final)` triples.
    #[must_use]
    pub fn triples(&self) -> impl Iterator<Item = (ReplyCode, &[u8], bool)> {
        self.messages
            .iter()
            .map(|message| (message.code(), message.text(), message.is_final()))
    }

    /// Consumes the reply, returning its messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl From<Vec<Message>> for Reply {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl IntoIterator for Reply {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a Reply {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
