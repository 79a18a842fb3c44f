//! Shared stubs for service tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;

use newsdesk_ai::{AiError, TextGenerator};
use newsdesk_core::{Article, Clock};

/// Scripted [`TextGenerator`] that counts calls and records prompts
pub struct StubGenerator {
    script: Mutex<VecDeque<Result<String, AiError>>>,
    default_reply: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    /// Reply with the same text on every call
    pub fn always(text: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Pop one scripted reply per call; further calls get `EmptyResponse`
    pub fn script(replies: Vec<Result<String, AiError>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            default_reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        if let Some(reply) = self.script.lock().pop_front() {
            return reply;
        }
        match &self.default_reply {
            Some(text) => Ok(text.clone()),
            None => Err(AiError::EmptyResponse),
        }
    }
}

/// Settable [`Clock`] for TTL and date-window tests
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.0.lock();
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock()
    }
}

/// Reference instant used across service tests
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

/// Build an article with the fields the services care about
pub fn article(title: &str, link: &str, published_at: Option<DateTime<Utc>>) -> Article {
    Article {
        title: title.to_string(),
        clean_title: newsdesk_feed::normalizer::clean_title(title),
        link: link.to_string(),
        published_at,
        source: "Test Wire".to_string(),
        description: format!("Description for {}", title),
    }
}
