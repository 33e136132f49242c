//! Error types for the Chatbase client.

use analyzer_core::CompletionError;
use thiserror::Error;

/// Result type for Chatbase client operations.
pub type Result<T> = std::result::Result<T, ChatbaseError>;

/// Chatbase client errors.
#[derive(Debug, Error)]
pub enum ChatbaseError {
    /// Configuration error (missing API key or chatbot id)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API error; `message` is the server-provided `message` field
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ChatbaseError> for CompletionError {
    fn from(err: ChatbaseError) -> Self {
        match err {
            ChatbaseError::Config(msg) => CompletionError::Config(msg),
            ChatbaseError::Network(e) => CompletionError::Transport(Box::new(e)),
            ChatbaseError::Api { status, message } => {
                CompletionError::Rejected { status, message }
            }
            ChatbaseError::Parse(msg) => CompletionError::Decode(msg),
        }
    }
}
