use crate::family::AddressFamily;
use crate::logging::LogFormat;

/// Control socket of the BIRD instance serving IPv4 routes.
pub const DEFAULT_V4_SOCKET: &str = "/var/run/bird/bird.ctl";

/// Control socket of the BIRD instance serving IPv6 routes.
pub const DEFAULT_V6_SOCKET: &str = "/var/run/bird/bird6.ctl";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Provides [`DEFAULT_LOG_FILTER`] for argument parsers.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Address family queried when neither a family nor a socket is given.
#[must_use]
pub const fn default_family() -> AddressFamily {
    AddressFamily::V4
}
