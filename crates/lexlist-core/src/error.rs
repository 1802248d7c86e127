use std::fmt;

use thiserror::Error;

/// Coarse classification of a failed page fetch, as surfaced to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response: connection refused, DNS failure, timeout.
    Network,
    /// 401/403 from the listing endpoint.
    Auth,
    /// Any other non-success status.
    Server,
    /// A response arrived but did not have the expected shape.
    Malformed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Network => "network",
            ErrorKind::Auth => "auth",
            ErrorKind::Server => "server",
            ErrorKind::Malformed => "malformed",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("authentication rejected with status {status}")]
    Auth { status: u16 },
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_) => ErrorKind::Network,
            FetchError::Auth { .. } => ErrorKind::Auth,
            FetchError::Server { .. } => ErrorKind::Server,
            FetchError::Malformed(_) => ErrorKind::Malformed,
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => FetchError::Auth { status },
            _ => FetchError::Server { status, body },
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter `{key}` for {listing}")]
    UnknownKey { listing: &'static str, key: String },
    #[error("invalid value for filter `{key}`: {value:?}")]
    InvalidValue { key: String, value: String },
    #[error("expected key=value, got {0:?}")]
    MalformedPair(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("page size must be between 1 and {max}, got {got}")]
    PageSize { got: usize, max: usize },
}
