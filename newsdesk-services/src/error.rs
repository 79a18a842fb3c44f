//! Service layer error type

use newsdesk_ai::AiError;
use newsdesk_feed::FeedError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the service layer
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Feed fetch or parse failure
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Text generation failure
    #[error("Generation error: {0}")]
    Generation(#[from] AiError),

    /// Summary store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Digest requested with nothing to write about
    #[error("No articles available for the digest")]
    NoArticles,
}
