//! Crate error types.

use std::fmt;

/// Errors raised by request construction, response resolution and
/// emission.
///
/// Only structural failures surface here. Missing environment fields,
/// unknown methods and unknown status codes degrade to documented
/// defaults instead of erroring.
#[derive(Debug)]
pub enum Error {
    /// Resolved host failed the host grammar. Fatal: no request value is
    /// produced.
    MalformedHost(String),

    /// A resolved header cannot be represented in `http` crate types.
    InvalidHeader(String),

    /// HTTP bridge error.
    Http(http::Error),

    /// Emitter transport error.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedHost(host) => write!(f, "malformed host: {:?}", host),
            Error::InvalidHeader(name) => write!(f, "invalid header: {:?}", name),
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::Http(e)
    }
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
