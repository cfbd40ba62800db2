// Error types shared by the fetcher and the resolver.

use thiserror::Error;

/// Why a single HTTP attempt failed. Every variant is retried by the fetcher.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("response body is not valid JSON: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status(status.as_u16())
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Why a lookup produced no hierarchy.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The service answered but knows nothing matching the name.
    #[error("no taxon found for '{0}'")]
    NotFound(String),

    /// Every attempt against the service failed.
    #[error("taxonomy service unavailable while {0}")]
    Unavailable(&'static str),

    #[error("selection cancelled")]
    Cancelled,

    #[error("could not read selection: {0}")]
    Prompt(#[from] std::io::Error),
}
