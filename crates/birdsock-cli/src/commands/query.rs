//! Bulk AS path lookup for prefixes read from stdin.

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use birdsock::{Client, Connector, Reply};
use tracing::{debug, warn};

use super::COMMANDS_TARGET;
use crate::cli::QueryArgs;
use crate::errors::AppError;
use crate::output::RouteLookup;

/// Pause between attempts after a failed send or an empty reply.
pub(crate) const RETRY_DELAY: Duration = Duration::from_millis(10);

/// Looks up every non-blank line of `stdin` as a prefix.
pub(crate) fn run_query<C, R, W>(
    client: &mut Client<C>,
    args: &QueryArgs,
    stdin: &mut R,
    stdout: &mut W,
) -> Result<(), AppError>
where
    C: Connector,
    R: BufRead,
    W: Write,
{
    for read in stdin.lines() {
        let line = read.map_err(AppError::ReadInput)?;
        let prefix = line.trim();
        if prefix.is_empty() {
            continue;
        }
        let reply = lookup(client, prefix, args.max_attempts)?;
        RouteLookup::from_reply(&reply).write_line(stdout, prefix)?;
    }
    stdout.flush().map_err(AppError::WriteOutput)
}

/// Sends the route query for `prefix` until a non-empty reply arrives.
///
/// A failed send reconnects before the next attempt; an empty reply means the
/// connection already recovered, so the command is simply sent again.
fn lookup<C: Connector>(
    client: &mut Client<C>,
    prefix: &str,
    max_attempts: u32,
) -> Result<Reply, AppError> {
    let command = format!("show route for {prefix} all");
    for attempt in 1..=max_attempts {
        if let Err(error) = client.send(&command) {
            warn!(target: COMMANDS_TARGET, attempt, %error, "send failed; reconnecting");
            client.reconnect()?;
            thread::sleep(RETRY_DELAY);
            continue;
        }
        let reply = client.receive_reply()?;
        if !reply.is_empty() {
            return Ok(reply);
        }
        debug!(target: COMMANDS_TARGET, attempt, prefix, "empty reply; retrying");
        thread::sleep(RETRY_DELAY);
    }
    Err(AppError::AttemptsExhausted {
        command,
        attempts: max_attempts,
    })
}
