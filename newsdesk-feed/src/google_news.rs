//! Google News RSS client
//!
//! Fetches topic-filtered news from the Google News RSS search endpoint
//! and normalizes every entry into an [`Article`]. Feeds are parsed as
//! RSS 2.0 first with an Atom fallback, since an explicit feed-URL
//! override may point at either format.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use newsdesk_core::Article;

use crate::error::FeedError;
use crate::normalizer::{normalize_atom_entry, normalize_item};

/// Locale pair for the Google News endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    /// Japanese edition (hl=ja, gl=JP)
    #[default]
    #[serde(rename = "jp")]
    Japan,
    /// US edition (hl=en, gl=US)
    #[serde(rename = "us")]
    UnitedStates,
}

impl Region {
    /// `hl`, `gl`, and `ceid` query parameters for this region
    pub fn locale_params(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            Region::Japan => ("ja", "JP", "JP:ja"),
            Region::UnitedStates => ("en", "US", "US:en"),
        }
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jp" | "ja" => Ok(Region::Japan),
            "us" | "en" => Ok(Region::UnitedStates),
            _ => Err(format!("Unknown region: {}", s)),
        }
    }
}

/// Google News RSS client
pub struct GoogleNewsClient {
    client: Client,
    base_url: String,
}

impl GoogleNewsClient {
    /// Create a new Google News client
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .user_agent("Mozilla/5.0 (compatible; Newsdesk/1.0)")
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: "https://news.google.com/rss/search".to_string(),
        }
    }

    /// Point the client at a different search endpoint (used by tests)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Build the search URL for a query and region
    pub fn search_url(&self, query: &str, region: Region) -> String {
        let (hl, gl, ceid) = region.locale_params();
        format!(
            "{}?q={}&hl={}&gl={}&ceid={}",
            self.base_url,
            urlencoding::encode(query),
            hl,
            gl,
            ceid
        )
    }

    /// Fetch and normalize articles for a search query
    pub async fn fetch_articles(
        &self,
        query: &str,
        region: Region,
    ) -> Result<Vec<Article>, FeedError> {
        let url = self.search_url(query, region);
        info!("Fetching Google News RSS: {}", url);
        self.fetch_feed_url(&url).await
    }

    /// Fetch and normalize articles from an explicit feed URL
    ///
    /// This is the `feed_url_override` path: the URL is used as-is, so any
    /// RSS or Atom feed can stand in for the Google News endpoint.
    pub async fn fetch_feed_url(&self, url: &str) -> Result<Vec<Article>, FeedError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::ApiError {
                status: response.status().as_u16(),
                message: format!("Feed returned status {}", response.status()),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

        let articles = parse_feed(&content, url)?;
        info!("Fetched {} articles from {}", articles.len(), url);
        Ok(articles)
    }
}

impl Default for GoogleNewsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse feed bytes as RSS 2.0 first, then Atom
fn parse_feed(content: &[u8], url: &str) -> Result<Vec<Article>, FeedError> {
    if let Ok(channel) = rss::Channel::read_from(content) {
        let total = channel.items().len();
        let articles: Vec<Article> = channel.items().iter().filter_map(normalize_item).collect();
        if articles.len() < total {
            debug!("Skipped {} malformed entries from {}", total - articles.len(), url);
        }
        return Ok(articles);
    }

    if let Ok(feed) = atom_syndication::Feed::read_from(content) {
        let total = feed.entries().len();
        let articles: Vec<Article> = feed.entries().iter().filter_map(normalize_atom_entry).collect();
        if articles.len() < total {
            debug!("Skipped {} malformed entries from {}", total - articles.len(), url);
        }
        return Ok(articles);
    }

    Err(FeedError::ParseError(format!("Failed to parse feed: {}", url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_query() {
        let client = GoogleNewsClient::new();
        let url = client.search_url("artificial intelligence", Region::UnitedStates);
        assert_eq!(
            url,
            "https://news.google.com/rss/search?q=artificial%20intelligence&hl=en&gl=US&ceid=US:en"
        );
    }

    #[test]
    fn test_search_url_japanese_region() {
        let client = GoogleNewsClient::new();
        let url = client.search_url("人工知能", Region::Japan);
        assert!(url.starts_with("https://news.google.com/rss/search?q=%E4%BA%BA%E5%B7%A5%E7%9F%A5%E8%83%BD"));
        assert!(url.ends_with("&hl=ja&gl=JP&ceid=JP:ja"));
    }

    #[test]
    fn test_region_from_str() {
        assert_eq!("jp".parse::<Region>().unwrap(), Region::Japan);
        assert_eq!("US".parse::<Region>().unwrap(), Region::UnitedStates);
        assert!("fr".parse::<Region>().is_err());
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        let err = parse_feed(b"not xml at all", "https://x.test/feed");
        assert!(matches!(err, Err(FeedError::ParseError(_))));
    }

    #[test]
    fn test_parse_feed_skips_malformed_entries() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>t</title><link>https://x</link><description>d</description>
<item><title>Good one - Wire</title><link>https://news.test/1</link></item>
<item><title>No link entry</title></item>
<item><title>Another - Wire</title><link>https://news.test/2</link></item>
</channel></rss>"#;

        let articles = parse_feed(xml, "https://x.test/feed").expect("feed parses");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].link, "https://news.test/1");
        assert_eq!(articles[1].link, "https://news.test/2");
    }
}
