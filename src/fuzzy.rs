//! Fuzzy subsequence scoring and candidate filtering.
//!
//! # Overview
//!
//! A query matches a candidate when every query character occurs in the
//! candidate, in order, ignoring case. Matches are ranked by a small set of
//! bonuses:
//!
//! - `+3` for each hit that directly follows the previous hit
//! - `+2` for each hit at the start of the text or right after `/`, `\` or `_`
//! - `+n` once the query is consumed, where `n` is the distance from the last
//!   hit to the end of the text
//!
//! # Example
//!
//! ```
//! use testpick::fuzzy::{fuzzy_filter, fuzzy_match};
//!
//! assert!(fuzzy_match("tau", "tests/test_auth.py").is_some());
//! assert!(fuzzy_match("zz", "tests/test_auth.py").is_none());
//!
//! let candidates = vec![
//!     "tests/test_cache.py".to_string(),
//!     "tests/test_auth.py".to_string(),
//! ];
//! assert_eq!(fuzzy_filter("auth", &candidates), vec!["tests/test_auth.py"]);
//! ```

/// Bonus for a hit immediately following the previous hit.
pub const CONSECUTIVE_BONUS: usize = 3;

/// Bonus for a hit at the start of the text or of a path segment / word.
pub const BOUNDARY_BONUS: usize = 2;

/// Characters after which a hit counts as a word-boundary hit.
const BOUNDARY_CHARS: [char; 3] = ['/', '\\', '_'];

/// Score `query` against `text`.
///
/// Returns `Some(score)` if `query` is a case-insensitive subsequence of
/// `text`, `None` otherwise. An empty query matches everything with a score
/// of `0`.
///
/// # Example
///
/// ```
/// use testpick::fuzzy::fuzzy_match;
///
/// let tight = fuzzy_match("ab", "xabx").unwrap();
/// let loose = fuzzy_match("ab", "xaxb").unwrap();
/// assert!(tight > loose);
/// ```
#[must_use]
pub fn fuzzy_match(query: &str, text: &str) -> Option<usize> {
    if query.is_empty() {
        return Some(0);
    }

    let query: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    let text: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();

    // A query longer than the text can never be a subsequence of it.
    if query.len() > text.len() {
        return None;
    }

    let mut qi = 0;
    let mut score = 0;
    let mut last_hit: Option<usize> = None;

    for (ti, &ch) in text.iter().enumerate() {
        if qi == query.len() {
            break;
        }
        if ch != query[qi] {
            continue;
        }

        if last_hit.is_some_and(|prev| ti == prev + 1) {
            score += CONSECUTIVE_BONUS;
        }
        if ti == 0 || BOUNDARY_CHARS.contains(&text[ti - 1]) {
            score += BOUNDARY_BONUS;
        }

        last_hit = Some(ti);
        qi += 1;
    }

    if qi < query.len() {
        return None;
    }

    // qi > 0 here, so there was at least one hit.
    let tail = last_hit.map_or(0, |last| text.len().saturating_sub(last));
    Some(score + tail)
}

/// A candidate paired with its match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScoredCandidate<'a> {
    candidate: &'a str,
    score: usize,
}

/// Filter and rank `candidates` against `query`.
///
/// An empty query returns every candidate in its original order. Otherwise
/// non-matching candidates are dropped and the rest are sorted by descending
/// score; equal scores keep their original relative order.
#[must_use]
pub fn fuzzy_filter(query: &str, candidates: &[String]) -> Vec<String> {
    if query.is_empty() {
        return candidates.to_vec();
    }

    let mut scored: Vec<ScoredCandidate<'_>> = candidates
        .iter()
        .filter_map(|candidate| {
            fuzzy_match(query, candidate).map(|score| ScoredCandidate {
                candidate: candidate.as_str(),
                score,
            })
        })
        .collect();

    // sort_by is stable, which keeps ties in snapshot order
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    log::trace!(
        "Filtered {} candidates with {:?}: {} matches",
        candidates.len(),
        query,
        scored.len()
    );

    scored
        .into_iter()
        .map(|s| s.candidate.to_string())
        .collect()
}
