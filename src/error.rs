//! Unified error type.

use std::fmt;

/// The error type returned by reqlog's fallible operations.
///
/// Request handling never produces an `Error`; failures there are expressed as
/// HTTP [`Response`](crate::Response) values. This type surfaces host-side
/// failures: binding a port, or plugin overrides that do not fit the plugin's
/// configuration.
#[derive(Debug)]
pub enum Error {
    /// Binding or accepting on the listener failed.
    Io(std::io::Error),
    /// User overrides could not be laid over the plugin's default config.
    Config(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e)     => write!(f, "io: {e}"),
            Self::Config(e) => write!(f, "invalid plugin config: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e)     => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}
