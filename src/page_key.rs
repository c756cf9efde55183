//! Page label interpretation.
//!
//! Publishers label their pages freely ("1면", "A1", "B 1면", "12"). Labels
//! are stored exactly as extracted; this module only *interprets* them:
//!
//! - [`normalize_key`] gives the equality form used to merge page blocks.
//! - [`sort_rank`] gives a numeric ordering key.
//! - [`is_first_page`] classifies the front page of an edition.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static SECTION_PAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z])(\d+)$").unwrap());
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

const FIRST_PAGE_LABELS: [&str; 4] = ["1면", "A1", "A1면", "1"];

/// Equality form of a page label: every whitespace character removed.
///
/// ```ignore
/// assert_eq!(normalize_key(" B 1 "), "B1");
/// ```
pub fn normalize_key(label: &str) -> String {
    label.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Numeric ordering key for a page label.
///
/// - `A1` style (one capital letter then digits): letter position × 1000 + number
/// - anything containing a digit run: the first digit run as an integer
/// - otherwise: code point of the first character × 1000
pub fn sort_rank(label: &str) -> u64 {
    let key = normalize_key(label);

    if let Some(caps) = SECTION_PAGE.captures(&key) {
        let letter = caps[1].chars().next().map_or(0, |c| c as u64 - 'A' as u64 + 1);
        let number = caps[2].parse::<u64>().unwrap_or(u64::MAX / 2);
        return letter.saturating_mul(1000).saturating_add(number);
    }

    if let Some(m) = DIGIT_RUN.find(&key) {
        // Digit runs too long for u64 still sort after everything sane.
        return m.as_str().parse::<u64>().unwrap_or(u64::MAX);
    }

    key.chars().next().map_or(0, |c| (c as u64) * 1000)
}

/// Total order over labels: [`sort_rank`] first, then the raw label string.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    sort_rank(a).cmp(&sort_rank(b)).then_with(|| a.cmp(b))
}

/// True iff the normalized label is exactly one of the front-page labels.
pub fn is_first_page(label: &str) -> bool {
    let key = normalize_key(label);
    FIRST_PAGE_LABELS.contains(&key.as_str())
}
