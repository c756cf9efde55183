//! Headline ↔ search-index item similarity.
//!
//! [`score`] is a pure function combining a title signal (exact, containment
//! or token overlap) with a same-domain boost. [`best_match`] picks the
//! highest-scoring candidate at or above [`MATCH_THRESHOLD`].
//!
//! Scraped links live on the aggregator's article host, and so do many
//! index links. A domain shared only through that host says nothing about
//! the article, so callers pass the aggregator domain to [`best_match`] and
//! it is never boosted.

use crate::models::MatchCandidate;
use crate::utils::strip_tags;
use std::collections::HashSet;
use url::Url;

/// Minimum score for a candidate to be accepted.
pub const MATCH_THRESHOLD: f64 = 0.6;

const EXACT_SCORE: f64 = 1.0;
const CONTAINS_SCORE: f64 = 0.8;
const SAME_DOMAIN_FLOOR: f64 = 0.9;

fn normalize_title(title: &str) -> String {
    strip_tags(title).trim().to_lowercase()
}

/// Hostname of `link` with a leading `www.` removed, or `None` if unparseable.
pub fn domain_of(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    (!host.is_empty()).then(|| host.to_lowercase())
}

fn title_score(a: &str, b: &str) -> f64 {
    if a == b {
        return EXACT_SCORE;
    }
    if !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a)) {
        return CONTAINS_SCORE;
    }

    let tokens_a: Vec<&str> = a.split_whitespace().collect();
    let tokens_b: Vec<&str> = b.split_whitespace().collect();
    let larger = tokens_a.len().max(tokens_b.len());
    if larger == 0 {
        return 0.0;
    }
    let set_b: HashSet<&str> = tokens_b.iter().copied().collect();
    let common = tokens_a.iter().filter(|t| set_b.contains(*t)).count();
    common as f64 / larger as f64
}

/// Match confidence in `[0, 1]` between a scraped headline and a candidate.
///
/// Same non-empty domain lifts the result to at least 0.9.
///
/// # Arguments
///
/// * `scraped_title` / `scraped_link` - The headline as extracted from the listing.
/// * `candidate_title` / `candidate_link` - One search-index item.
///
/// # Returns
///
/// `1.0` for equal normalized titles, `0.8` when one contains the other,
/// otherwise the shared-token ratio; then the same-domain floor.
pub fn score(scraped_title: &str, scraped_link: &str, candidate_title: &str, candidate_link: &str) -> f64 {
    score_excluding(scraped_title, scraped_link, candidate_title, candidate_link, None)
}

/// [`score`], except that a shared domain equal to `aggregator` gives no boost.
pub fn score_excluding(
    scraped_title: &str,
    scraped_link: &str,
    candidate_title: &str,
    candidate_link: &str,
    aggregator: Option<&str>,
) -> f64 {
    let base = title_score(
        &normalize_title(scraped_title),
        &normalize_title(candidate_title),
    );

    match (domain_of(scraped_link), domain_of(candidate_link)) {
        (Some(a), Some(b)) if a == b && aggregator != Some(a.as_str()) => base.max(SAME_DOMAIN_FLOOR),
        _ => base,
    }
}

/// Index and score of the best acceptable candidate.
///
/// # Arguments
///
/// * `title` / `link` - The scraped headline.
/// * `candidates` - Search-index items in relevance order.
/// * `aggregator` - Domain of the aggregator's article host (see [`domain_of`]);
///   sharing it is not a same-domain signal.
///
/// # Returns
///
/// `Some((index, score))` for the highest score at or above
/// [`MATCH_THRESHOLD`], `None` otherwise. Ties keep the earliest candidate.
pub fn best_match(
    title: &str,
    link: &str,
    candidates: &[MatchCandidate],
    aggregator: Option<&str>,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let s = score_excluding(title, link, &candidate.title, candidate.comparable_link(), aggregator);
        if s < MATCH_THRESHOLD {
            continue;
        }
        if best.is_none_or(|(_, top)| s > top) {
            best = Some((i, s));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK_A: &str = "https://www.hankyung.com/article/2024010112345";
    const LINK_B: &str = "https://www.chosun.com/economy/2024/01/01/ABC/";

    fn candidate(title: &str, link: &str) -> MatchCandidate {
        MatchCandidate {
            title: title.to_string(),
            link: link.to_string(),
            description: format!("{title} 요약"),
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_match_is_one() {
        assert_eq!(score("삼성전자 실적 발표", LINK_A, "삼성전자 실적 발표", LINK_A), 1.0);
    }

    #[test]
    fn test_exact_match_ignores_tags_and_case() {
        assert_eq!(score("Apple Earnings", LINK_A, " <b>apple</b> earnings ", LINK_B), 1.0);
    }

    #[test]
    fn test_containment_is_point_eight_across_domains() {
        assert_eq!(score("삼성전자 실적", LINK_A, "삼성전자 실적 발표 임박", LINK_B), 0.8);
        assert_eq!(score("삼성전자 실적 발표 임박", LINK_A, "삼성전자 실적", LINK_B), 0.8);
    }

    #[test]
    fn test_disjoint_tokens_score_zero() {
        assert_eq!(score("금리 인상", LINK_A, "날씨 맑음", LINK_B), 0.0);
    }

    #[test]
    fn test_token_overlap_divides_by_larger_count() {
        // 2 shared of max(3, 4)
        assert_eq!(score("정부 예산 확정", LINK_A, "내년 정부 예산 논의", LINK_B), 0.5);
    }

    #[test]
    fn test_token_overlap_is_set_membership() {
        // "a" appears twice on the left; both occurrences count, denominator is 3
        let s = score("x a a", LINK_A, "a y z", LINK_B);
        assert!((s - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_domain_boost() {
        assert_eq!(score("금리 인상", LINK_A, "날씨 맑음", "https://hankyung.com/other"), 0.9);
        assert_eq!(score("금리 인상", LINK_A, "금리 인상", "https://hankyung.com/other"), 1.0);
    }

    #[test]
    fn test_empty_or_invalid_domains_do_not_boost() {
        assert_eq!(score("금리 인상", "", "날씨 맑음", ""), 0.0);
        assert_eq!(score("금리 인상", "not a url", "날씨 맑음", "not a url"), 0.0);
    }

    #[test]
    fn test_empty_titles() {
        // both empty normalize to equal strings
        assert_eq!(score("", LINK_A, "", LINK_B), 1.0);
        assert_eq!(score("", LINK_A, "무언가", LINK_B), 0.0);
    }

    #[test]
    fn test_tag_only_title_is_not_contained() {
        // "<b></b>" normalizes to "", which contains nothing and is contained by nothing
        assert_eq!(score("금리 인상", LINK_A, "<b></b>", LINK_B), 0.0);
        assert_eq!(score("<i> </i>", LINK_A, "금리 인상", LINK_B), 0.0);
    }

    #[test]
    fn test_aggregator_domain_gives_no_boost() {
        let scraped = "https://n.news.naver.com/article/newspaper/023/0003800001";
        let hosted = "https://n.news.naver.com/mnews/article/468/0001";
        assert_eq!(score("금리 인상", scraped, "날씨 맑음", hosted), 0.9);
        assert_eq!(
            score_excluding("금리 인상", scraped, "날씨 맑음", hosted, Some("n.news.naver.com")),
            0.0
        );
        assert_eq!(
            score_excluding("금리 인상", LINK_A, "날씨 맑음", LINK_A, Some("n.news.naver.com")),
            0.9
        );
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://www.Example.com/a").as_deref(), Some("example.com"));
        assert_eq!(domain_of("https://n.news.naver.com/x").as_deref(), Some("n.news.naver.com"));
        assert_eq!(domain_of("/relative"), None);
    }

    #[test]
    fn test_best_match_prefers_highest_then_first() {
        let candidates = vec![
            candidate("관련 없는 기사", LINK_B),
            candidate("삼성전자 실적 발표 임박", LINK_B),
            candidate("삼성전자 실적", LINK_B),
            candidate("삼성전자 실적 발표", LINK_B),
        ];
        assert_eq!(best_match("삼성전자 실적 발표", LINK_A, &candidates, None), Some((3, 1.0)));

        let ties = vec![
            candidate("삼성전자 실적 발표 임박", LINK_B),
            candidate("속보 삼성전자 실적 발표", LINK_B),
        ];
        assert_eq!(best_match("삼성전자 실적 발표", LINK_A, &ties, None), Some((0, 0.8)));
    }

    #[test]
    fn test_best_match_rejects_below_threshold() {
        let candidates = vec![candidate("정부 예산 논의 시작", LINK_B)];
        assert_eq!(best_match("정부 예산 확정", LINK_A, &candidates, None), None);
        assert_eq!(best_match("정부 예산 확정", LINK_A, &[], None), None);
    }

    #[test]
    fn test_best_match_compares_original_link_first() {
        let scraped = "https://n.news.naver.com/article/newspaper/023/0003800001";
        let unrelated = MatchCandidate {
            title: "아이돌 그룹 컴백 무대 공개".to_string(),
            original_link: "https://www.starnews.com/1".to_string(),
            link: "https://n.news.naver.com/mnews/article/468/0001".to_string(),
            ..Default::default()
        };
        assert_eq!(best_match("한은 기준금리 동결", scraped, &[unrelated], None), None);
    }
}
