//! Article data structures for the news pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized news article built from one feed entry
///
/// Immutable once constructed. Identity is the `link` field: it drives
/// de-duplication in ranking results and keys the summary cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Article title as published in the feed
    pub title: String,
    /// Title with the trailing `" - Source"` suffix stripped
    pub clean_title: String,
    /// Article URL
    pub link: String,
    /// Publication date; `None` when the feed date was unparsable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Source name (placeholder when the feed omits a source tag)
    pub source: String,
    /// Description with markup stripped and whitespace collapsed
    pub description: String,
}

/// Time window for ranking requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Published within the last day
    Today,
    /// Published within the last 7 days
    Week,
    /// Published within the last 30 days
    Month,
    /// No date restriction
    All,
}

impl Period {
    /// Maximum age in days for the window, `None` = unbounded
    pub fn max_days(&self) -> Option<i64> {
        match self {
            Period::Today => Some(1),
            Period::Week => Some(7),
            Period::Month => Some(30),
            Period::All => None,
        }
    }

    /// Whether an article published at `published_at` falls inside this
    /// window as seen from `now`
    ///
    /// An article qualifies iff `ceil(|now - published_at| / 1 day)` is
    /// within the window's day bound. Articles without a parsed date are
    /// excluded from every bounded window but pass `All`.
    pub fn contains(&self, published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let Some(max_days) = self.max_days() else {
            return true;
        };
        let Some(published_at) = published_at else {
            return false;
        };

        let diff_secs = (now - published_at).num_seconds().abs();
        let diff_days = (diff_secs + 86_399) / 86_400;
        diff_days <= max_days
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
            Period::All => "all",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" => Ok(Period::Today),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "all" => Ok(Period::All),
            _ => Err(format!("Unknown period: {}", s)),
        }
    }
}

/// One page of a sorted article list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    /// Articles on this page
    pub articles: Vec<Article>,
    /// Zero-based page index
    pub page: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Total number of articles across all pages
    pub total_articles: usize,
}

/// Sort articles most-recent-first; articles without a parsed date sort last
///
/// The sort is stable so undated articles keep their feed order.
pub fn sort_by_recency(articles: &mut [Article]) {
    articles.sort_by(|a, b| match (b.published_at, a.published_at) {
        (Some(b_date), Some(a_date)) => b_date.cmp(&a_date),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
