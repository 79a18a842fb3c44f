//! Feed pipeline
//!
//! Composes the feed client and the summary/ranking services into the
//! operations a front end or digest job actually calls: fetch and sort a
//! feed, narrow it by keywords, page it, warm the summary cache for the
//! visible articles and hand out summaries and rankings.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use newsdesk_core::{sort_by_recency, Article, FeedPage, Period};
use newsdesk_feed::{GoogleNewsClient, Region};

use crate::error::ServiceError;
use crate::pacer::RequestPacer;
use crate::ranking::RankingService;
use crate::summary::SummaryService;

/// Tuning for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// How many leading articles get their summaries prefetched
    pub prefetch_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { prefetch_count: 5 }
    }
}

/// End-to-end news pipeline
pub struct FeedPipeline {
    feed: GoogleNewsClient,
    summaries: Arc<SummaryService>,
    ranking: RankingService,
    pacer: Arc<RequestPacer>,
    config: PipelineConfig,
}

impl FeedPipeline {
    pub fn new(
        feed: GoogleNewsClient,
        summaries: Arc<SummaryService>,
        ranking: RankingService,
        pacer: Arc<RequestPacer>,
    ) -> Self {
        Self {
            feed,
            summaries,
            ranking,
            pacer,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetch, normalize and sort a feed, most recent first
    ///
    /// `feed_url_override` replaces the Google News search endpoint with an
    /// arbitrary RSS or Atom URL; `query` and `region` are ignored then.
    #[instrument(skip(self))]
    pub async fn fetch_articles(
        &self,
        query: &str,
        region: Region,
        feed_url_override: Option<&str>,
    ) -> Result<Vec<Article>, ServiceError> {
        let mut articles = match feed_url_override {
            Some(url) => self.feed.fetch_feed_url(url).await?,
            None => self.feed.fetch_articles(query, region).await?,
        };
        sort_by_recency(&mut articles);
        Ok(articles)
    }

    /// Warm the summary cache for the first `prefetch_count` articles
    ///
    /// Runs the fetches concurrently; the pacer staggers the underlying
    /// generation calls. Failures are logged and skipped. Returns how many
    /// summaries were obtained.
    pub async fn prefetch_summaries(&self, articles: &[Article]) -> usize {
        let count = articles.len().min(self.config.prefetch_count);
        let tasks = articles[..count].iter().map(|article| {
            let pacer = Arc::clone(&self.pacer);
            let summaries = Arc::clone(&self.summaries);
            async move {
                pacer.acquire().await;
                match summaries.get_summary(article).await {
                    Ok(_) => true,
                    Err(e) => {
                        warn!("Summary prefetch failed for {}: {}", article.link, e);
                        false
                    }
                }
            }
        });

        let obtained = futures::future::join_all(tasks)
            .await
            .into_iter()
            .filter(|ok| *ok)
            .count();
        debug!("Prefetched {}/{} summaries", obtained, count);
        obtained
    }

    /// Summary for one article; the caller picks the fallback text on error
    pub async fn get_summary(&self, article: &Article) -> Result<String, ServiceError> {
        self.summaries.get_summary(article).await
    }

    /// Up to 5 articles from `articles` ranked within `period`, best effort
    pub async fn get_ranking(&self, articles: &[Article], period: Period) -> Vec<Article> {
        self.ranking.rank(articles, period).await
    }
}

/// Keep articles whose title or description contains any keyword
///
/// Matching is case-insensitive substring; an empty keyword list keeps
/// everything.
pub fn filter_by_keywords(articles: &[Article], keywords: &[&str]) -> Vec<Article> {
    if keywords.is_empty() {
        return articles.to_vec();
    }

    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    articles
        .iter()
        .filter(|article| {
            let title = article.title.to_lowercase();
            let description = article.description.to_lowercase();
            needles
                .iter()
                .any(|needle| title.contains(needle) || description.contains(needle))
        })
        .cloned()
        .collect()
}

/// Cut one page out of the article list
///
/// `page` is 0-based. A page past the end comes back empty but still
/// carries the correct totals.
pub fn paginate(articles: &[Article], page: usize, page_size: usize) -> FeedPage {
    let total_articles = articles.len();
    let total_pages = if page_size == 0 {
        0
    } else {
        total_articles.div_ceil(page_size)
    };

    let page_articles = if page_size == 0 {
        Vec::new()
    } else {
        articles
            .iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect()
    };

    FeedPage {
        articles: page_articles,
        page,
        total_pages,
        total_articles,
    }
}
