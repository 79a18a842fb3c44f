//! AI-assisted importance ranking
//!
//! One generation call ranks a capped candidate window; everything after
//! that is deterministic cleanup. Ranking never surfaces an error: any
//! upstream failure degrades to recency order.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use newsdesk_ai::{first_int_array, ranking_prompt, RankCandidate, TextGenerator};
use newsdesk_core::{Article, Clock, Period};

use crate::error::ServiceError;

/// Tuning for the ranking pipeline
#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// How many filtered articles are offered to the model
    pub max_candidates: usize,
    /// How many articles a ranking returns at most
    pub max_results: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_candidates: 20,
            max_results: 5,
        }
    }
}

/// Ranks articles by estimated importance within a time window
pub struct RankingService {
    generator: Arc<dyn TextGenerator>,
    clock: Arc<dyn Clock>,
    config: RankingConfig,
}

impl RankingService {
    pub fn new(generator: Arc<dyn TextGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            generator,
            clock,
            config: RankingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RankingConfig) -> Self {
        self.config = config;
        self
    }

    /// Pick up to `max_results` articles from `articles` within `period`
    ///
    /// Returned ids index the date-filtered list, so an id past the
    /// candidate window still resolves; out-of-range ids are dropped.
    /// Duplicated links are collapsed and the list is backfilled with
    /// unranked articles in their original order.
    #[instrument(skip(self, articles), fields(period = %period, total = articles.len()))]
    pub async fn rank(&self, articles: &[Article], period: Period) -> Vec<Article> {
        let now = self.clock.now();
        let filtered: Vec<&Article> = articles
            .iter()
            .filter(|a| period.contains(a.published_at, now))
            .collect();

        if filtered.is_empty() {
            return Vec::new();
        }

        let candidates: Vec<RankCandidate> = filtered
            .iter()
            .take(self.config.max_candidates)
            .enumerate()
            .map(|(id, article)| RankCandidate {
                id,
                title: article.title.clone(),
            })
            .collect();

        let ranked_ids = match self.request_ranking(&candidates).await {
            Ok(ids) if !ids.is_empty() => ids,
            Ok(_) => {
                debug!("Ranking reply had no usable ids, using recency order");
                return head(&filtered, self.config.max_results);
            }
            Err(e) => {
                warn!("Ranking call failed ({}), using recency order", e);
                return head(&filtered, self.config.max_results);
            }
        };

        let mut seen_links: HashSet<&str> = HashSet::new();
        let mut ranked: Vec<Article> = Vec::new();

        for id in ranked_ids {
            let Ok(idx) = usize::try_from(id) else { continue };
            let Some(article) = filtered.get(idx) else { continue };
            if seen_links.insert(article.link.as_str()) {
                ranked.push((*article).clone());
            }
        }

        // Top up with the freshest unranked articles
        for article in &filtered {
            if ranked.len() >= self.config.max_results {
                break;
            }
            if seen_links.insert(article.link.as_str()) {
                ranked.push((*article).clone());
            }
        }

        ranked.truncate(self.config.max_results);
        ranked
    }

    async fn request_ranking(&self, candidates: &[RankCandidate]) -> Result<Vec<i64>, ServiceError> {
        let prompt = ranking_prompt(candidates);
        let reply = self.generator.generate(&prompt).await?;
        // No parseable array in the reply counts as an empty ranking
        Ok(first_int_array(&reply).unwrap_or_default())
    }
}

fn head(filtered: &[&Article], count: usize) -> Vec<Article> {
    filtered.iter().take(count).map(|a| (*a).clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{article, test_now, FixedClock, StubGenerator};
    use chrono::Duration;
    use newsdesk_ai::AiError;

    fn ranking(generator: Arc<StubGenerator>) -> RankingService {
        RankingService::new(generator, Arc::new(FixedClock::at(test_now())))
    }

    fn dated(title: &str, link: &str, age: Duration) -> Article {
        article(title, link, Some(test_now() - age))
    }

    #[tokio::test]
    async fn test_empty_input_returns_empty_without_calling_api() {
        let generator = Arc::new(StubGenerator::always("[0]"));
        let service = ranking(Arc::clone(&generator));

        let result = service.rank(&[], Period::All).await;

        assert!(result.is_empty());
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_orders_by_returned_ids() {
        let generator = Arc::new(StubGenerator::always("[2, 0, 1]"));
        let service = ranking(generator);
        let articles = vec![
            dated("First", "https://a.example/1", Duration::hours(1)),
            dated("Second", "https://a.example/2", Duration::hours(2)),
            dated("Third", "https://a.example/3", Duration::hours(3)),
        ];

        let result = service.rank(&articles, Period::All).await;

        let titles: Vec<&str> = result.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "First", "Second"]);
    }

    #[tokio::test]
    async fn test_never_more_than_five_and_no_duplicate_links() {
        let generator = Arc::new(StubGenerator::always("[0, 1, 2, 3, 4, 5, 6, 7]"));
        let service = ranking(generator);
        let articles: Vec<Article> = (0..8)
            .map(|i| {
                dated(
                    &format!("Story {}", i),
                    &format!("https://a.example/{}", i),
                    Duration::hours(i),
                )
            })
            .collect();

        let result = service.rank(&articles, Period::All).await;

        assert_eq!(result.len(), 5);
        let links: HashSet<&str> = result.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(links.len(), 5);
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back_to_recency_order() {
        let generator = Arc::new(StubGenerator::script(vec![Err(AiError::RequestFailed(
            "connection refused".to_string(),
        ))]));
        let service = ranking(generator);
        let articles: Vec<Article> = (0..7)
            .map(|i| {
                dated(
                    &format!("Story {}", i),
                    &format!("https://a.example/{}", i),
                    Duration::hours(i),
                )
            })
            .collect();

        let result = service.rank(&articles, Period::Today).await;

        let titles: Vec<&str> = result.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Story 0", "Story 1", "Story 2", "Story 3", "Story 4"]
        );
    }

    #[tokio::test]
    async fn test_reply_without_ids_falls_back() {
        let generator = Arc::new(StubGenerator::always("I could not decide on a ranking."));
        let service = ranking(generator);
        let articles = vec![
            dated("First", "https://a.example/1", Duration::hours(1)),
            dated("Second", "https://a.example/2", Duration::hours(2)),
        ];

        let result = service.rank(&articles, Period::All).await;

        let titles: Vec<&str> = result.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_prose_wrapped_ids_are_extracted() {
        let generator = Arc::new(StubGenerator::always(
            "Sure! The most important stories are: [1, 0]. Hope this helps.",
        ));
        let service = ranking(generator);
        let articles = vec![
            dated("First", "https://a.example/1", Duration::hours(1)),
            dated("Second", "https://a.example/2", Duration::hours(2)),
        ];

        let result = service.rank(&articles, Period::All).await;

        let titles: Vec<&str> = result.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_out_of_range_and_negative_ids_dropped() {
        let generator = Arc::new(StubGenerator::always("[2, 99, -1, 0]"));
        let service = ranking(generator);
        let articles = vec![
            dated("First", "https://a.example/1", Duration::hours(1)),
            dated("Second", "https://a.example/2", Duration::hours(2)),
            dated("Third", "https://a.example/3", Duration::hours(3)),
        ];

        let result = service.rank(&articles, Period::All).await;

        let titles: Vec<&str> = result.iter().map(|a| a.title.as_str()).collect();
        // Valid ids first, then backfill in original order
        assert_eq!(titles, vec!["Third", "First", "Second"]);
    }

    #[tokio::test]
    async fn test_duplicate_links_collapsed() {
        let generator = Arc::new(StubGenerator::always("[0, 1, 2]"));
        let service = ranking(generator);
        let articles = vec![
            dated("Syndicated", "https://a.example/same", Duration::hours(1)),
            dated("Syndicated again", "https://a.example/same", Duration::hours(2)),
            dated("Other", "https://a.example/other", Duration::hours(3)),
        ];

        let result = service.rank(&articles, Period::All).await;

        assert_eq!(result.len(), 2);
        let links: HashSet<&str> = result.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(links.len(), 2);
    }

    #[tokio::test]
    async fn test_date_window_excludes_stale_candidates() {
        let generator = Arc::new(StubGenerator::always("[0, 1]"));
        let service = ranking(Arc::clone(&generator));
        let articles = vec![
            dated("Fresh", "https://a.example/fresh", Duration::hours(2)),
            dated("Yesterday", "https://a.example/yday", Duration::hours(26)),
            dated("Stale", "https://a.example/stale", Duration::days(40)),
        ];

        let result = service.rank(&articles, Period::Week).await;

        let titles: Vec<&str> = result.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Fresh", "Yesterday"]);

        // The stale article must not even reach the prompt
        let prompt = generator.last_prompt().unwrap();
        assert!(!prompt.contains("Stale"));
    }

    #[tokio::test]
    async fn test_week_month_all_windows() {
        let articles = vec![
            dated("Today", "https://a.example/1", Duration::hours(2)),
            dated("Yesterday", "https://a.example/2", Duration::hours(26)),
            dated("Old", "https://a.example/3", Duration::days(40)),
        ];
        let failing = || {
            Arc::new(StubGenerator::script(vec![Err(AiError::RequestFailed(
                "down".to_string(),
            ))]))
        };

        let week = ranking(failing()).rank(&articles, Period::Week).await;
        assert_eq!(week.len(), 2);
        assert_eq!(week[0].title, "Today");
        assert_eq!(week[1].title, "Yesterday");

        let month = ranking(failing()).rank(&articles, Period::Month).await;
        assert_eq!(month.len(), 2);

        let all = ranking(failing()).rank(&articles, Period::All).await;
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_undated_articles_excluded_from_bounded_windows() {
        let generator = Arc::new(StubGenerator::always("[0]"));
        let service = ranking(generator);
        let articles = vec![
            article("Undated", "https://a.example/undated", None),
            dated("Dated", "https://a.example/dated", Duration::hours(1)),
        ];

        let today = service.rank(&articles, Period::Today).await;
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].title, "Dated");

        // Unbounded window keeps the undated article
        let all = service.rank(&articles, Period::All).await;
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_candidate_window_caps_at_twenty() {
        let generator = Arc::new(StubGenerator::always("[0]"));
        let service = ranking(Arc::clone(&generator));
        let articles: Vec<Article> = (0..30)
            .map(|i| {
                dated(
                    &format!("Story {:02}", i),
                    &format!("https://a.example/{}", i),
                    Duration::minutes(i),
                )
            })
            .collect();

        service.rank(&articles, Period::All).await;

        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.contains("Story 19"));
        assert!(!prompt.contains("Story 20"));
    }
}
