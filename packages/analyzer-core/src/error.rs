//! Typed errors for the analyzer core.
//!
//! The aggregator and renderer are pure; the only failures here come from
//! invalid input at construction time or from the external collaborators
//! (geo-data fetch, chat completion).

use thiserror::Error;

/// Boxed error from a collaborator implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by a [`GeoSource`](crate::traits::GeoSource).
///
/// "No results" is not an error: see [`Fetched::Empty`](crate::types::Fetched).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (DNS, connection, timeout)
    #[error("geo-data request failed: {0}")]
    Transport(#[source] BoxError),

    /// The service answered with a non-success status
    #[error("geo-data service returned {status}: {message}")]
    Service { status: u16, message: String },

    /// The response could not be decoded
    #[error("invalid geo-data response: {0}")]
    Decode(String),

    /// The source does not support this kind of query
    #[error("query not supported by this geo-data source: {0}")]
    Unsupported(&'static str),
}

/// Errors returned by a [`CompletionService`](crate::traits::CompletionService).
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Missing credentials or chatbot identifier
    #[error("completion service not configured: {0}")]
    Config(String),

    /// Transport failure
    #[error("completion request failed: {0}")]
    Transport(#[source] BoxError),

    /// Non-200 response; `message` is the server-provided text
    #[error("completion rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response could not be decoded
    #[error("invalid completion response: {0}")]
    Decode(String),
}

/// Invalid tag filter text or parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagFilterError {
    #[error("tag filter is empty")]
    Empty,

    #[error("tag key is empty in {0:?}")]
    EmptyKey(String),

    #[error("tag value is empty in {0:?}")]
    EmptyValue(String),

    #[error("tag filter contains a forbidden character {ch:?}: {input:?}")]
    ForbiddenChar { input: String, ch: char },
}

/// Page geometry that leaves no room to print.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("page dimensions must be positive (got {width} x {height})")]
    PageSize { width: f32, height: f32 },

    #[error("line height must be positive (got {0})")]
    LineHeight(f32),

    #[error("margins leave no printable area")]
    NoPrintableArea,
}
