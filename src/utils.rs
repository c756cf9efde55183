//! Text helpers shared by the extractor and the matcher.
//!
//! - Whitespace and tag cleanup for scraped and search-index text
//! - Entity unescaping for search-index descriptions
//! - Search query derivation from a headline
//! - String truncation for logging

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
// `\w` is Unicode-aware; the Hangul syllable range is listed explicitly anyway.
static NON_QUERY_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s가-힣]").unwrap());

/// Maximum whitespace-delimited tokens kept in a derived query.
pub const QUERY_MAX_TOKENS: usize = 5;
/// Maximum characters kept in a derived query.
pub const QUERY_MAX_CHARS: usize = 20;

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove anything that looks like an HTML tag.
pub fn strip_tags(s: &str) -> String {
    HTML_TAG.replace_all(s, "").into_owned()
}

/// Unescape the four entities the search index emits in descriptions.
///
/// `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
pub fn unescape_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Turn a search-index description into a plain-text summary.
pub fn clean_description(s: &str) -> String {
    unescape_entities(&strip_tags(s)).trim().to_string()
}

/// Derive a search query from a headline.
///
/// Punctuation is dropped, at most [`QUERY_MAX_TOKENS`] tokens are kept and the
/// result is cut to [`QUERY_MAX_CHARS`] characters. May return an empty string.
///
/// ```ignore
/// assert_eq!(derive_query("[단독] 삼성전자, 3분기 실적 발표"), "단독 삼성전자 3분기 실적 발표");
/// ```
pub fn derive_query(title: &str) -> String {
    let cleaned = NON_QUERY_CHARS.replace_all(title, "");
    let tokens = cleaned
        .split_whitespace()
        .take(QUERY_MAX_TOKENS)
        .collect::<Vec<_>>()
        .join(" ");
    tokens
        .chars()
        .take(QUERY_MAX_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Truncate a string for logging purposes.
///
/// Cuts on a character boundary and appends `"…(+N bytes)"` with the number
/// of bytes dropped.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
