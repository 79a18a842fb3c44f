//! Feed acquisition for the Newsdesk pipeline
//!
//! This crate covers everything between the network and a canonical
//! [`Article`](newsdesk_core::Article):
//! - Google News RSS search client (with RSS/Atom parsing)
//! - per-entry normalization (title cleaning, markup stripping, dates)
//! - best-effort article body extraction for summarization

pub mod error;
pub mod extract;
pub mod google_news;
pub mod normalizer;

pub use error::FeedError;
pub use extract::{ArticleExtractor, ExtractorConfig};
pub use google_news::{GoogleNewsClient, Region};
