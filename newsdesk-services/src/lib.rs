//! Service layer for the Newsdesk pipeline
//!
//! This crate composes the feed and generation crates into the operations
//! the dashboard and the digest job consume: paginated topic feeds, cached
//! article summaries, best-effort importance rankings and the rendered
//! daily digest.

pub mod digest;
pub mod error;
pub mod pacer;
pub mod pipeline;
pub mod ranking;
pub mod store;
pub mod summary;

#[cfg(test)]
mod test_utils;

pub use digest::{Digest, DigestBuilder, DigestConfig};
pub use error::ServiceError;
pub use pacer::{PacerStats, RequestPacer};
pub use pipeline::{filter_by_keywords, paginate, FeedPipeline, PipelineConfig};
pub use ranking::{RankingConfig, RankingService};
pub use store::{StoreError, StoredSummary, SummaryStore};
pub use summary::{SummaryConfig, SummaryService};
