//! Feed entry normalization
//!
//! Turns one raw RSS `<item>` or Atom `<entry>` into a canonical
//! [`Article`]. Entries missing a title or link are skipped; an unparsable
//! publication date keeps the entry but leaves `published_at` unset.

use chrono::{DateTime, Utc};
use newsdesk_core::Article;
use tracing::debug;

/// Source name used when a feed entry carries no source tag
pub const SOURCE_PLACEHOLDER: &str = "Google News";

/// Normalize one RSS item into an Article
///
/// Returns `None` when the item has no title or no link; one bad entry
/// must not abort the rest of the feed.
pub fn normalize_item(item: &rss::Item) -> Option<Article> {
    let title = item.title()?.to_string();
    let link = item.link()?.to_string();

    let published_at = item.pub_date().and_then(parse_feed_date);
    if item.pub_date().is_some() && published_at.is_none() {
        debug!("Unparsable pubDate '{}' for {}", item.pub_date().unwrap_or_default(), link);
    }

    let description = item.description().map(strip_markup).unwrap_or_default();

    let source = item
        .source()
        .and_then(|s| s.title())
        .map(str::to_string)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| SOURCE_PLACEHOLDER.to_string());

    Some(Article {
        clean_title: clean_title(&title),
        title,
        link,
        published_at,
        source,
        description,
    })
}

/// Normalize one Atom entry into an Article
pub fn normalize_atom_entry(entry: &atom_syndication::Entry) -> Option<Article> {
    let title = entry.title().to_string();
    let link = entry.links().first().map(|l| l.href().to_string())?;

    let published_at = entry
        .published()
        .or_else(|| Some(entry.updated()))
        .map(|d| d.with_timezone(&Utc));

    let summary_html = entry.summary().map(|s| s.as_str()).unwrap_or_default();
    let content_html = entry.content().and_then(|c| c.value()).unwrap_or_default();
    let description = if !summary_html.is_empty() {
        strip_markup(summary_html)
    } else {
        strip_markup(content_html)
    };

    Some(Article {
        clean_title: clean_title(&title),
        title,
        link,
        published_at,
        source: SOURCE_PLACEHOLDER.to_string(),
        description,
    })
}

/// Strip the `" - Source"` suffix Google News appends to titles
///
/// Only the suffix after the last `" - "` is removed, and only when that
/// occurrence is not at position 0, so titles that open with a dash
/// survive intact.
pub fn clean_title(title: &str) -> String {
    match title.rfind(" - ") {
        Some(pos) if pos > 0 => title[..pos].trim().to_string(),
        _ => title.to_string(),
    }
}

/// Strip markup from feed HTML and collapse whitespace
///
/// Entities are decoded before the tag scan, so text that decodes into
/// angle brackets is consumed by the scan as well; the output never
/// contains `<` or `>`.
pub fn strip_markup(html: &str) -> String {
    let decoded = html
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");

    let mut result = String::with_capacity(decoded.len());
    let mut in_tag = false;

    for c in decoded.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a feed date string, trying RFC 2822 first, then RFC 3339
pub fn parse_feed_date(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(date)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            DateTime::parse_from_rfc3339(date)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}
