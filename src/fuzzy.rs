//! Fuzzy name matching used to validate best-effort search results.
//!
//! The upstream search endpoints return a single top-ranked candidate with
//! no guarantee of relevance, so every identity resolution is gated by a
//! similarity check against the user's query.

use strsim::normalized_levenshtein;

/// Minimum similarity for a candidate to be accepted as the queried entity.
///
/// 0.9 tolerates punctuation and encoding noise (apostrophe variants, a
/// stray underscore) while rejecting genuinely different names.
pub const SIMILARITY_THRESHOLD: f64 = 0.9;

/// Normalized similarity between two strings in [0, 1], case-insensitive.
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Check whether two names are similar enough to denote the same entity.
pub fn is_match(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) >= threshold
}

/// Drop an edition suffix from a canonical track title.
///
/// Catalog titles for older tracks often carry a "<core> - <suffix>" form
/// (e.g. "Stairway to Heaven - Remaster"); only the core part takes part
/// in title comparison.
pub fn strip_edition_suffix(title: &str) -> &str {
    match title.split_once(" - ") {
        Some((core, _)) => core,
        None => title,
    }
}

/// Strip a leading definite article ("The " / "the ") from an artist name.
///
/// Applied to the query before comparing against catalog entries whose
/// artist names are stored without the article.
pub fn strip_leading_article(name: &str) -> &str {
    for prefix in ["The ", "the "] {
        if let Some(rest) = name.strip_prefix(prefix) {
            return rest.trim_start();
        }
    }
    name
}
