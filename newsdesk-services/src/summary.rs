//! Article summarization with a persistent cache
//!
//! Cache key is the article link (title when the link is blank). Hits are
//! served from the store; misses extract the page body, fall back to feed
//! metadata when extraction comes up short, and send one generation call.
//! Failures propagate as typed errors and are never cached, so the next
//! request retries instead of pinning the failure.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use newsdesk_ai::{summary_prompt, TextGenerator};
use newsdesk_core::{Article, Clock};
use newsdesk_feed::ArticleExtractor;

use crate::error::ServiceError;
use crate::store::SummaryStore;

/// Tuning for the summary pipeline
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Extracted bodies shorter than this use the feed description instead
    pub min_body_chars: usize,
    /// Extracted bodies are cut to this length before prompting
    pub max_body_chars: usize,
    /// Cache lifetime; `None` keeps summaries forever
    pub ttl: Option<Duration>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_body_chars: 200,
            max_body_chars: 10_000,
            ttl: Some(Duration::days(7)),
        }
    }
}

/// Cached summarization service
pub struct SummaryService {
    generator: Arc<dyn TextGenerator>,
    extractor: ArticleExtractor,
    store: Arc<SummaryStore>,
    clock: Arc<dyn Clock>,
    /// Per-key locks so concurrent requests for one article make one call
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    config: SummaryConfig,
}

impl SummaryService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        extractor: ArticleExtractor,
        store: Arc<SummaryStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            generator,
            extractor,
            store,
            clock,
            in_flight: Mutex::new(HashMap::new()),
            config: SummaryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SummaryConfig) -> Self {
        self.config = config;
        self
    }

    /// Summary cache key: the link, or the title for link-less articles
    fn cache_key(article: &Article) -> &str {
        if article.link.is_empty() {
            &article.title
        } else {
            &article.link
        }
    }

    /// Return the cached summary or generate, store and return a fresh one
    ///
    /// Errors are returned to the caller undecorated; the caller picks the
    /// user-facing fallback (usually the feed description).
    #[instrument(skip(self, article), fields(title = %article.clean_title))]
    pub async fn get_summary(&self, article: &Article) -> Result<String, ServiceError> {
        let key = Self::cache_key(article).to_string();

        if let Some(cached) = self.store.get(&key, self.config.ttl, self.clock.now()) {
            debug!("Summary cache hit");
            return Ok(cached);
        }

        let key_lock = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(
                in_flight
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        let guard = key_lock.lock().await;

        // A concurrent holder may have filled the cache while we waited
        if let Some(cached) = self.store.get(&key, self.config.ttl, self.clock.now()) {
            return Ok(cached);
        }

        let result = self.summarize(article).await;

        if let Ok(summary) = &result {
            self.store.insert(&key, summary, self.clock.now())?;
        }

        drop(guard);
        // A request arriving right here recreates the lock and may redo the
        // work; that wastes one upstream call but stays consistent.
        self.in_flight.lock().await.remove(&key);

        result
    }

    /// Drop cache entries older than the configured TTL
    pub fn purge_expired(&self) -> Result<usize, ServiceError> {
        Ok(self.store.purge_expired(self.config.ttl, self.clock.now())?)
    }

    async fn summarize(&self, article: &Article) -> Result<String, ServiceError> {
        let body = self.extractor.extract_text(&article.link).await;

        let prompt = if body.chars().count() < self.config.min_body_chars {
            debug!(
                "Extracted body too short ({} chars), using feed description",
                body.chars().count()
            );
            summary_prompt(&article.clean_title, &article.description)
        } else {
            summary_prompt(
                &article.clean_title,
                truncate_chars(&body, self.config.max_body_chars),
            )
        };

        let summary = self.generator.generate(&prompt).await?;
        Ok(summary.trim().to_string())
    }
}

/// Cut `text` to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
