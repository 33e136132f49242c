//! Error types for the Overpass client.

use analyzer_core::FetchError;
use thiserror::Error;

/// Result type for Overpass client operations.
pub type Result<T> = std::result::Result<T, OverpassError>;

/// Overpass client errors.
#[derive(Debug, Error)]
pub enum OverpassError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API error (non-2xx response, rate limit, bad query)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The server answered 200 but reported a runtime error in `remark`
    #[error("Query error: {0}")]
    Remark(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<OverpassError> for FetchError {
    fn from(err: OverpassError) -> Self {
        match err {
            OverpassError::Network(e) => FetchError::Transport(Box::new(e)),
            OverpassError::Api { status, message } => FetchError::Service { status, message },
            OverpassError::Remark(message) => FetchError::Service {
                status: 200,
                message,
            },
            OverpassError::Parse(message) => FetchError::Decode(message),
        }
    }
}
