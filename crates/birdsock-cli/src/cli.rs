//! Command-line argument definitions for the `birdsock` binary.

use birdsock::DEFAULT_CHUNK_SIZE;
use birdsock_config::{
    AddressFamily, LogFormat, SocketEndpoint, default_family, default_log_filter,
    default_log_format,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default command sent by `bench`.
pub(crate) const DEFAULT_BENCH_COMMAND: &str = "show route for 8.8.8.8 all";

/// Talks to a BIRD routing daemon over its control socket.
#[derive(Parser, Debug)]
#[command(name = "birdsock", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Socket and transport selection.
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    /// Diagnostic output selection.
    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
    /// Operation to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Flags controlling how the control socket is reached.
#[derive(Args, Debug, Clone)]
pub(crate) struct ConnectionArgs {
    /// Control socket path, bare or as a `unix://` URL. Overrides `--family`.
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) socket: Option<SocketEndpoint>,
    /// BIRD instance whose canonical socket is used when `--socket` is absent.
    #[arg(long, global = true, value_enum, default_value_t = default_family())]
    pub(crate) family: AddressFamily,
    /// Bytes requested per socket read.
    #[arg(long, global = true, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub(crate) chunk_size: usize,
    /// Read timeout in milliseconds; reads block indefinitely when absent.
    #[arg(long, global = true, value_name = "MS")]
    pub(crate) read_timeout_ms: Option<u64>,
    /// Write timeout in milliseconds; writes block indefinitely when absent.
    #[arg(long, global = true, value_name = "MS")]
    pub(crate) write_timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub(crate) connect_timeout_ms: Option<u64>,
}

/// Flags controlling diagnostic output on stderr.
#[derive(Args, Debug, Clone)]
pub(crate) struct LoggingArgs {
    /// Tracing filter directive, for example `birdsock=debug`.
    #[arg(long, global = true, default_value = default_log_filter())]
    pub(crate) log_filter: String,
    /// Diagnostic line format.
    #[arg(long, global = true, value_enum, default_value_t = default_log_format())]
    pub(crate) log_format: LogFormat,
}

/// Subcommands understood by the binary.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Sends one command repeatedly and reports throughput.
    Bench(BenchArgs),
    /// Looks up the AS path of every prefix read from stdin.
    Query(QueryArgs),
    /// Sends one raw command and prints the reply.
    Exec(ExecArgs),
}

/// Arguments for `bench`.
#[derive(Args, Debug, Clone)]
pub(crate) struct BenchArgs {
    /// Number of request/reply exchanges.
    #[arg(long, default_value_t = 10_000)]
    pub(crate) iterations: u64,
    /// Command sent on every iteration.
    #[arg(long, default_value = DEFAULT_BENCH_COMMAND)]
    pub(crate) command: String,
}

/// Arguments for `query`.
#[derive(Args, Debug, Clone)]
pub(crate) struct QueryArgs {
    /// Attempts per prefix before giving up.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) max_attempts: u32,
}

/// Arguments for `exec`.
#[derive(Args, Debug, Clone)]
pub(crate) struct ExecArgs {
    /// Reply rendering.
    #[arg(long, value_enum, default_value_t = ReplyFormat::Text)]
    pub(crate) output: ReplyFormat,
    /// Command words, joined with single spaces.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) words: Vec<String>,
}

impl ExecArgs {
    /// Command line sent to the daemon.
    pub(crate) fn command(&self) -> String {
        self.words.join(" ")
    }
}

/// Rendering applied to replies printed by `exec`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum ReplyFormat {
    /// Wire-like text, one coded line per message.
    #[default]
    Text,
    /// One JSON object per message.
    Json,
}
