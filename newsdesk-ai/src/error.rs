//! Error types for text generation

use thiserror::Error;

/// Errors that can occur when calling the generation API
#[derive(Debug, Error)]
pub enum AiError {
    /// OPENAI_API_KEY is not set in the environment
    #[error("Missing OPENAI_API_KEY environment variable")]
    MissingApiKey,

    /// Request construction or transport failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The API answered but returned no usable text
    #[error("Empty response from generation API")]
    EmptyResponse,
}
