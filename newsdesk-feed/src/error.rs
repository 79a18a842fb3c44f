//! Error types for feed acquisition

use thiserror::Error;

/// Errors that can occur while fetching or parsing feeds
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Upstream returned a non-success status
    #[error("Feed error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Document could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    ParseError(String),
}
