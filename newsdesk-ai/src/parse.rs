//! Defensive extraction of structured data from model replies
//!
//! The generation API promises nothing about its output format: ranked ids
//! may arrive as bare JSON, inside a code fence, or buried in prose. All of
//! that fragility is contained here so call sites stay simple.

/// Pull the first integer array out of free-form model output
///
/// A fenced code block (```json or bare ```) is scanned first when present,
/// then the whole text. Every `[` starts a candidate ending at the next
/// `]`; the first candidate that parses as a JSON integer array wins.
/// Returns `None` when no candidate parses.
pub fn first_int_array(text: &str) -> Option<Vec<i64>> {
    if let Some(block) = fenced_block(text) {
        if let Some(ids) = scan_arrays(block) {
            return Some(ids);
        }
    }
    scan_arrays(text)
}

/// Contents of the first fenced code block, if any
fn fenced_block(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        if let Some(end) = rest.find("```") {
            return Some(rest[..end].trim());
        }
    }

    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        if let Some(end) = rest.find("```") {
            return Some(rest[..end].trim());
        }
    }

    None
}

/// First `[`..`]` substring that parses as an integer array
fn scan_arrays(text: &str) -> Option<Vec<i64>> {
    for (start, _) in text.match_indices('[') {
        if let Some(offset) = text[start..].find(']') {
            let candidate = &text[start..=start + offset];
            if let Ok(ids) = serde_json::from_str::<Vec<i64>>(candidate) {
                return Some(ids);
            }
        }
    }
    None
}
