//! Unified error type.

use std::fmt;

/// The error type returned by lenga's fallible operations.
///
/// Locale negotiation itself is infallible — every request resolves to a
/// supported locale or the fallback, and malformed input falls through
/// silently. `Error` surfaces the two things that can actually go wrong:
/// invalid configuration at startup, and infrastructure failures (binding
/// a port, accepting a connection).
#[derive(Debug)]
pub enum Error {
    /// Invalid configuration, e.g. a fallback locale that is not in the
    /// supported set, or an empty locale code.
    Config(String),
    /// Socket-level failure while binding or accepting.
    Io(std::io::Error),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(_) => None,
            Self::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
