//! Daily digest builder
//!
//! Renders the ranked top stories for a period into a plain-text email
//! body. Every per-article step soft-fails (a missing summary becomes the
//! feed description, a missing overview is dropped); only an empty ranked
//! list is an error, since there is nothing worth sending then.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use newsdesk_ai::{digest_prompt, TextGenerator};
use newsdesk_core::{Article, Clock, Period};

use crate::error::ServiceError;
use crate::ranking::RankingService;
use crate::summary::SummaryService;

/// Rendered digest content, ready for delivery
#[derive(Debug, Clone)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

/// Tuning for digest rendering
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Prepend a model-written overview of the day's stories
    pub include_overview: bool,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            include_overview: true,
        }
    }
}

/// Builds the daily digest from a fetched article list
pub struct DigestBuilder {
    ranking: RankingService,
    summaries: Arc<SummaryService>,
    generator: Arc<dyn TextGenerator>,
    clock: Arc<dyn Clock>,
    config: DigestConfig,
}

impl DigestBuilder {
    pub fn new(
        ranking: RankingService,
        summaries: Arc<SummaryService>,
        generator: Arc<dyn TextGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ranking,
            summaries,
            generator,
            clock,
            config: DigestConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DigestConfig) -> Self {
        self.config = config;
        self
    }

    /// Rank, summarize and render the digest for `period`
    #[instrument(skip(self, articles), fields(period = %period, total = articles.len()))]
    pub async fn build(
        &self,
        articles: &[Article],
        period: Period,
    ) -> Result<Digest, ServiceError> {
        let ranked = self.ranking.rank(articles, period).await;
        if ranked.is_empty() {
            return Err(ServiceError::NoArticles);
        }

        let mut entries = Vec::with_capacity(ranked.len());
        for (rank, article) in ranked.iter().enumerate() {
            let summary = match self.summaries.get_summary(article).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!("Digest summary failed for {}: {}", article.link, e);
                    article.description.clone()
                }
            };
            entries.push(render_entry(rank, article, &summary));
        }

        let mut body = String::new();
        if self.config.include_overview {
            let headlines: Vec<&str> = ranked.iter().map(|a| a.clean_title.as_str()).collect();
            match self.generator.generate(&digest_prompt(&headlines)).await {
                Ok(overview) => {
                    body.push_str(overview.trim());
                    body.push_str("\n\n");
                }
                Err(e) => debug!("Digest overview failed ({}), skipping", e),
            }
        }
        body.push_str(&entries.join("\n\n"));

        let subject = format!("Daily News Digest - {}", self.clock.now().format("%Y-%m-%d"));
        Ok(Digest { subject, body })
    }
}

fn render_entry(rank: usize, article: &Article, summary: &str) -> String {
    let date = article
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "undated".to_string());

    format!(
        "{}. {} ({}, {})\n   {}\n   {}",
        rank + 1,
        article.clean_title,
        article.source,
        date,
        summary,
        article.link
    )
}
