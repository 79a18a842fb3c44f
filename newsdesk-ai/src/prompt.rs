//! Prompt builders
//!
//! Pure functions from pipeline data to prompt strings, so the exact text
//! sent upstream is testable without any client in the loop.

use serde::Serialize;

/// Restricted article view sent to the ranking API
///
/// `id` is the article's position in the date-filtered list and is only
/// meaningful within a single ranking call.
#[derive(Debug, Clone, Serialize)]
pub struct RankCandidate {
    /// Position in the filtered article list
    pub id: usize,
    /// Full feed title
    pub title: String,
}

/// Build the summary prompt for one article
///
/// `content` is either the extracted page body or, when extraction came up
/// short, the feed description. The target length is fixed so summaries
/// render consistently.
pub fn summary_prompt(title: &str, content: &str) -> String {
    format!(
        "Summarize this news article in 2-3 sentences (at most 80 words). \
         Respond with the summary only, no preamble.\n\n\
         Title: {}\n\n\
         Article content:\n{}",
        title, content
    )
}

/// Build the ranking prompt for a candidate list
pub fn ranking_prompt(candidates: &[RankCandidate]) -> String {
    let items = serde_json::to_string(candidates).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are an editor choosing the most important stories for a news \
         briefing.\n\n\
         Candidate headlines as JSON (id, title):\n{}\n\n\
         Rank them by importance and respond with ONLY a JSON array of ids \
         in descending importance, e.g. [3, 0, 7, 1, 2]. Include at most 5 \
         ids.",
        items
    )
}

/// Build the digest overview prompt from the day's top headlines
pub fn digest_prompt(headlines: &[&str]) -> String {
    let list = headlines
        .iter()
        .map(|h| format!("- {}", h))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Write a short overview (2 sentences at most) of today's top \
         stories for a daily email digest. Respond with the overview only.\n\n\
         Top stories:\n{}",
        list
    )
}
