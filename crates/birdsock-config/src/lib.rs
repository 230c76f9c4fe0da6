//! Shared configuration primitives for the birdsock workspace.
//!
//! The protocol engine itself takes every setting explicitly at construction
//! time. This crate only supplies the conventional defaults that callers use
//! to fill those settings in: the canonical control socket for each BIRD
//! instance, the default log filter, and the supported log formats.

mod defaults;
mod family;
mod logging;
mod socket;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_V4_SOCKET, DEFAULT_V6_SOCKET, default_family, default_log_filter,
    default_log_format,
};
pub use family::{AddressFamily, AddressFamilyParseError};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError};
