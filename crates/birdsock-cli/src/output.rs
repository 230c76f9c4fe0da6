//! Rendering of daemon replies for stdout.

use std::borrow::Cow;
use std::io::Write;

use birdsock::{Message, Reply, ReplyCode};
use serde::Serialize;

use crate::cli::ReplyFormat;
use crate::errors::AppError;

const AS_PATH_ATTRIBUTE: &str = "BGP.as_path: ";

/// JSON shape of one reply message.
#[derive(Debug, Serialize)]
struct MessageRecord<'a> {
    code: String,
    text: Cow<'a, str>,
    #[serde(rename = "final")]
    is_final: bool,
}

impl<'a> From<&'a Message> for MessageRecord<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            code: message.code().to_string(),
            text: message.text_lossy(),
            is_final: message.is_final(),
        }
    }
}

/// Writes every message of `reply` to `out` in the requested format.
pub(crate) fn write_reply<W: Write>(
    out: &mut W,
    reply: &Reply,
    format: ReplyFormat,
) -> Result<(), AppError> {
    for message in reply {
        match format {
            ReplyFormat::Text => write_text_message(out, message)?,
            ReplyFormat::Json => {
                serde_json::to_writer(&mut *out, &MessageRecord::from(message))
                    .map_err(AppError::SerialiseMessage)?;
                writeln!(out).map_err(AppError::WriteOutput)?;
            }
        }
    }
    Ok(())
}

// Mirrors the wire layout: `-` marks more to come, continuation lines are
// indented by one space.
fn write_text_message<W: Write>(out: &mut W, message: &Message) -> Result<(), AppError> {
    let separator = if message.is_final() { ' ' } else { '-' };
    let text = message.text_lossy();
    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or_default();
    writeln!(out, "{}{separator}{first}", message.code()).map_err(AppError::WriteOutput)?;
    for line in lines {
        writeln!(out, " {line}").map_err(AppError::WriteOutput)?;
    }
    Ok(())
}

/// Result of looking up one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RouteLookup {
    /// The AS path of the first route detail entry.
    AsPath(String),
    /// Code and text of every message preceding any usable route entry.
    Errors(Vec<String>),
}

impl RouteLookup {
    /// Scans `reply` for the first route detail message carrying an AS path.
    pub(crate) fn from_reply(reply: &Reply) -> Self {
        let mut errors = Vec::new();
        for message in reply {
            if message.code() == ReplyCode::ROUTE_DETAIL
                && let Some(path) = as_path(message)
            {
                return Self::AsPath(path);
            }
            errors.push(message.code().to_string());
            errors.push(message.text_lossy().into_owned());
        }
        Self::Errors(errors)
    }

    /// Writes the tab-separated result line for `prefix`.
    pub(crate) fn write_line<W: Write>(&self, out: &mut W, prefix: &str) -> Result<(), AppError> {
        let written = match self {
            Self::AsPath(path) => writeln!(out, "{prefix}\t{path}"),
            Self::Errors(errors) => writeln!(out, "{prefix}\tErrors: {}", errors.join(", ")),
        };
        written.map_err(AppError::WriteOutput)
    }
}

fn as_path(message: &Message) -> Option<String> {
    let text = message.text_lossy();
    let (_, rest) = text.split_once(AS_PATH_ATTRIBUTE)?;
    let path = rest.split('\n').next().unwrap_or_default();
    Some(path.to_owned())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn code(digits: &[u8; 4]) -> ReplyCode {
        ReplyCode::from_bytes(*digits).expect("valid code")
    }

    fn route_reply() -> Reply {
        Reply::from(vec![
            Message::new(code(b"1007"), "Table master4:", false),
            Message::new(
                ReplyCode::ROUTE_DETAIL,
                "8.8.8.0/24 unicast [peer1 2024-01-01] * (100) [AS15169i]\n\tType: BGP univ\n\tBGP.as_path: 64500 15169\n\tBGP.next_hop: 192.0.2.1",
                false,
            ),
            Message::new(ReplyCode::OK, "", true),
        ])
    }

    fn render(reply: &Reply, format: ReplyFormat) -> String {
        let mut out = Vec::new();
        write_reply(&mut out, reply, format).expect("render reply");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn text_rendering_mirrors_the_wire_layout() {
        let reply = Reply::from(vec![
            Message::new(ReplyCode::ROUTE_DETAIL, "route A\ncontinuation text", false),
            Message::new(ReplyCode::OK, "", true),
        ]);

        assert_eq!(
            render(&reply, ReplyFormat::Text),
            "1012-route A\n continuation text\n0000 \n"
        );
    }

    #[test]
    fn json_rendering_emits_one_object_per_message() {
        let reply = Reply::from(vec![Message::new(
            code(b"8001"),
            "Network not in table",
            true,
        )]);

        assert_eq!(
            render(&reply, ReplyFormat::Json),
            "{\"code\":\"8001\",\"text\":\"Network not in table\",\"final\":true}\n"
        );
    }

    #[test]
    fn lookup_extracts_the_as_path() {
        assert_eq!(
            RouteLookup::from_reply(&route_reply()),
            RouteLookup::AsPath(String::from("64500 15169"))
        );
    }

    #[rstest]
    #[case::not_in_table(
        vec![Message::new(code(b"8001"), "Network not in table", true)],
        "192.0.2.0/24\tErrors: 8001, Network not in table\n"
    )]
    #[case::route_without_as_path(
        vec![
            Message::new(ReplyCode::ROUTE_DETAIL, "192.0.2.0/24 unicast [static1]", false),
            Message::new(ReplyCode::OK, "", true),
        ],
        "192.0.2.0/24\tErrors: 1012, 192.0.2.0/24 unicast [static1], 0000, \n"
    )]
    fn lookup_without_as_path_lists_every_message(
        #[case] messages: Vec<Message>,
        #[case] expected: &str,
    ) {
        let lookup = RouteLookup::from_reply(&Reply::from(messages));
        let mut out = Vec::new();

        lookup.write_line(&mut out, "192.0.2.0/24").expect("write line");

        assert_eq!(String::from_utf8(out).expect("utf-8 output"), expected);
    }

    #[test]
    fn lookup_line_uses_a_tab_separator() {
        let mut out = Vec::new();
        RouteLookup::from_reply(&route_reply())
            .write_line(&mut out, "8.8.8.0/24")
            .expect("write line");

        assert_eq!(out, b"8.8.8.0/24\t64500 15169\n");
    }
}
