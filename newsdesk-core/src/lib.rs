//! Core types for the Newsdesk pipeline
//!
//! This crate defines the shared data structures used across the pipeline:
//! the canonical article record, ranking periods, pagination, and the
//! injected clock that keeps time-dependent logic testable.

pub mod article;
pub mod clock;

pub use article::{sort_by_recency, Article, FeedPage, Period};
pub use clock::{Clock, SystemClock};
