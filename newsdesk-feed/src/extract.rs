//! Best-effort article body extraction
//!
//! Fetches an article page and pulls plain text out of it for
//! summarization. Extraction never fails: timeouts, network errors,
//! redirect loops, and unparsable pages all yield an empty string and the
//! caller falls back to the feed description.

use reqwest::{header, redirect, Client};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::error::FeedError;
use crate::normalizer::strip_markup;

/// Extraction limits and identity
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Timeout for each HTTP attempt
    pub timeout: std::time::Duration,
    /// Maximum number of redirects to follow
    pub max_redirects: usize,
    /// User agent sent with page requests
    pub user_agent: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout: std::time::Duration::from_secs(8),
            max_redirects: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Article page fetcher and text extractor
pub struct ArticleExtractor {
    client: Client,
    config: ExtractorConfig,
}

impl ArticleExtractor {
    /// Create an extractor with default limits
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    /// Create an extractor with explicit limits
    ///
    /// Redirects are handled by an explicit loop below, so the underlying
    /// client has automatic redirects disabled.
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self {
            client: Client::builder()
                .redirect(redirect::Policy::none())
                .timeout(config.timeout)
                .user_agent(&config.user_agent)
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    /// Fetch a page and extract its body text
    ///
    /// Always returns; the empty string signals that nothing usable could
    /// be extracted.
    pub async fn extract_text(&self, url: &str) -> String {
        match self.fetch_html(url).await {
            Ok(html) => extract_body_text(&html),
            Err(e) => {
                warn!("Extraction failed for {}: {}", url, e);
                String::new()
            }
        }
    }

    /// Fetch the final HTML document, following redirects manually
    ///
    /// The hop counter bounds pathological redirect chains; exceeding it is
    /// an error here and empty text at the caller.
    async fn fetch_html(&self, url: &str) -> Result<String, FeedError> {
        let mut current = Url::parse(url).map_err(|e| FeedError::ParseError(e.to_string()))?;

        for hop in 0..=self.config.max_redirects {
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

            let status = response.status();
            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| {
                        FeedError::RequestFailed(format!("Redirect without location from {}", current))
                    })?;

                current = current
                    .join(location)
                    .map_err(|e| FeedError::ParseError(e.to_string()))?;
                debug!("Redirect hop {} -> {}", hop + 1, current);
                continue;
            }

            if !status.is_success() {
                return Err(FeedError::ApiError {
                    status: status.as_u16(),
                    message: format!("Article fetch returned status {}", status),
                });
            }

            return response
                .text()
                .await
                .map_err(|e| FeedError::RequestFailed(e.to_string()));
        }

        Err(FeedError::RequestFailed(format!(
            "Too many redirects (> {}) for {}",
            self.config.max_redirects, url
        )))
    }
}

impl Default for ArticleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract readable text from an HTML document
///
/// Paragraph blocks win when present; otherwise the whole document is
/// stripped of script/style blocks and remaining tags.
pub fn extract_body_text(html: &str) -> String {
    let document = Html::parse_document(html);

    if let Ok(selector) = Selector::parse("p") {
        let paragraphs: Vec<String> = document
            .select(&selector)
            .map(|el| {
                el.text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|p| !p.is_empty())
            .collect();

        if !paragraphs.is_empty() {
            return paragraphs.join("\n");
        }
    }

    strip_document(html)
}

/// Whole-document fallback: drop script/style blocks, then all tags
fn strip_document(html: &str) -> String {
    let without_scripts = remove_blocks(html, "script");
    let without_styles = remove_blocks(&without_scripts, "style");
    strip_markup(&without_styles)
}

/// Remove `<tag ...>...</tag>` blocks, case-insensitively
///
/// Searches over an ASCII-lowercased copy so byte offsets stay valid for
/// the original string.
fn remove_blocks(html: &str, tag: &str) -> String {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let lower = html.to_ascii_lowercase();

    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(found) = lower[pos..].find(&open) {
        let start = pos + found;
        out.push_str(&html[pos..start]);
        match lower[start..].find(&close) {
            Some(end) => pos = start + end + close.len(),
            None => return out,
        }
    }

    out.push_str(&html[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_body_text_prefers_paragraphs() {
        let html = r#"<html><body>
            <nav>menu menu</nav>
            <p>First <b>paragraph</b> here.</p>
            <p>   Second   paragraph.   </p>
            <p></p>
        </body></html>"#;

        let text = extract_body_text(html);
        assert_eq!(text, "First paragraph here.\nSecond paragraph.");
    }

    #[test]
    fn test_extract_body_text_fallback_strips_everything() {
        let html = r#"<html><head>
            <script>var x = "<p>not text</p>";</script>
            <style>.a { color: red }</style>
        </head><body><div>Body text here</div></body></html>"#;

        let text = extract_body_text(html);
        assert_eq!(text, "Body text here");
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_remove_blocks_is_case_insensitive() {
        let html = "a<SCRIPT>x</SCRIPT>b<script type=\"x\">y</script>c";
        assert_eq!(remove_blocks(html, "script"), "abc");
    }

    #[test]
    fn test_remove_blocks_unclosed_drops_tail() {
        assert_eq!(remove_blocks("keep<script>dangling", "script"), "keep");
    }

    #[test]
    fn test_extract_body_text_empty_document() {
        assert_eq!(extract_body_text(""), "");
    }
}
