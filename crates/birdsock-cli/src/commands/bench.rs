//! Request/reply throughput measurement.

use std::io::Write;
use std::time::{Duration, Instant};

use birdsock::{Client, Connector};
use tracing::debug;

use super::COMMANDS_TARGET;
use crate::cli::BenchArgs;
use crate::errors::AppError;

/// Outcome of a benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BenchReport {
    pub(crate) exchanges: u64,
    pub(crate) lost: u64,
    pub(crate) elapsed: Duration,
}

impl BenchReport {
    /// Exchanges that returned a non-empty reply.
    pub(crate) const fn completed(&self) -> u64 {
        self.exchanges.saturating_sub(self.lost)
    }

    /// Completed exchanges per second, rounded down. Lost exchanges do not
    /// count towards the rate.
    pub(crate) fn rate(&self) -> Option<u128> {
        u128::from(self.completed())
            .checked_mul(1_000_000)
            .and_then(|scaled| scaled.checked_div(self.elapsed.as_micros()))
    }
}

/// Sends the benchmark command `args.iterations` times, discarding replies.
pub(crate) fn run_bench<C, W>(
    client: &mut Client<C>,
    args: &BenchArgs,
    stdout: &mut W,
) -> Result<BenchReport, AppError>
where
    C: Connector,
    W: Write,
{
    writeln!(stdout, "Connected to daemon: {}", client.banner()).map_err(AppError::WriteOutput)?;
    writeln!(
        stdout,
        "Sending '{}' {} times...",
        args.command, args.iterations
    )
    .map_err(AppError::WriteOutput)?;

    let started = Instant::now();
    let mut lost = 0_u64;
    for _ in 0..args.iterations {
        if client.request(&args.command)?.is_empty() {
            lost = lost.saturating_add(1);
        }
    }
    let report = BenchReport {
        exchanges: args.iterations,
        lost,
        elapsed: started.elapsed(),
    };
    debug!(target: COMMANDS_TARGET, ?report, "benchmark finished");

    write!(
        stdout,
        "{} exchanges in {:.3?}",
        report.exchanges, report.elapsed
    )
    .map_err(AppError::WriteOutput)?;
    let rate_written = match report.rate() {
        Some(rate) => writeln!(stdout, " ({rate} replies/s)"),
        None => writeln!(stdout),
    };
    rate_written.map_err(AppError::WriteOutput)?;
    if report.lost > 0 {
        writeln!(stdout, "{} exchanges returned an empty reply", report.lost)
            .map_err(AppError::WriteOutput)?;
    }
    Ok(report)
}
