//! Approximate string matching
//!
//! Scores are distances in `[0, 1]` where 0 means identical after folding case
//! and whitespace. Two scores are used:
//!
//! - [`distance`] compares two whole labels with a symmetric Jaro-Winkler
//!   distance. Abbreviations and suffix variants ("Main St Library" /
//!   "Main Street Library") score low, which is what label deduplication needs.
//! - [`match_score`] measures how well a query occurs somewhere inside a text:
//!   exact containment scores 0, otherwise the best normalized Levenshtein
//!   distance between the query and any run of the text's words.
//!
//! Thresholds are always supplied by the caller.

use tracing::trace;
use crate::utils::helpers::fold_text;

/// Symmetric whole-label distance
pub fn distance(a: &str, b: &str) -> f64 {
    let a = fold_text(a);
    let b = fold_text(b);
    folded_distance(&a, &b)
}

fn folded_distance(a: &str, b: &str) -> f64 {
    if a == b {
        return 0.0;
    }
    if a.is_empty() || b.is_empty() {
        return 1.0;
    }
    // strsim's matching pass walks the first argument, so take the better of both orders
    let similarity = strsim::jaro_winkler(a, b).max(strsim::jaro_winkler(b, a));
    (1.0 - similarity).clamp(0.0, 1.0)
}

/// How far `query` is from occurring inside `text`, `None` for an empty query
pub fn match_score(query: &str, text: &str) -> Option<f64> {
    let query = fold_text(query);
    if query.is_empty() {
        return None;
    }
    let text = fold_text(text);
    if text.is_empty() {
        return Some(1.0);
    }
    if text.contains(&query) {
        return Some(0.0);
    }

    let mut best = 1.0 - strsim::normalized_levenshtein(&query, &text);

    let words: Vec<&str> = text.split(' ').collect();
    let query_words = query.split(' ').count();
    let min_window = query_words.saturating_sub(1).max(1);
    let max_window = (query_words + 1).min(words.len());

    for size in min_window..=max_window {
        for window in words.windows(size) {
            let candidate = window.join(" ");
            let score = 1.0 - strsim::normalized_levenshtein(&query, &candidate);
            if score < best {
                best = score;
            }
        }
    }

    Some(best.clamp(0.0, 1.0))
}

/// Keep the first label of every similarity cluster, in encounter order
///
/// Greedy single pass: each label not yet claimed becomes a representative and
/// claims every label within `threshold` of it.
pub fn dedupe<S: AsRef<str>>(items: &[S], threshold: f64) -> Vec<String> {
    let folded: Vec<String> = items.iter().map(|item| fold_text(item.as_ref())).collect();
    let mut used = vec![false; items.len()];
    let mut kept = Vec::new();

    for i in 0..items.len() {
        if used[i] {
            continue;
        }
        for j in i..items.len() {
            if !used[j] && folded_distance(&folded[i], &folded[j]) <= threshold {
                used[j] = true;
            }
        }
        kept.push(items[i].as_ref().to_string());
    }

    trace!(input = items.len(), kept = kept.len(), threshold, "Deduplicated labels");
    kept
}

/// True when `query` equals a corpus entry or approximately occurs in one
pub fn matches<S: AsRef<str>>(corpus: &[S], query: &str, threshold: f64) -> bool {
    if corpus.iter().any(|entry| entry.as_ref() == query) {
        return true;
    }
    if query.is_empty() {
        return false;
    }
    corpus.iter().any(|entry| {
        match_score(query, entry.as_ref()).map_or(false, |score| score <= threshold)
    })
}

/// Keys of the items whose text matches `query`, best match first
///
/// Ties keep the input order.
pub fn rank<K, S>(items: &[(K, S)], query: &str, threshold: f64) -> Vec<K>
where
    K: Clone,
    S: AsRef<str>,
{
    if query.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(f64, usize)> = items
        .iter()
        .enumerate()
        .filter_map(|(index, (_, text))| {
            let score = if text.as_ref() == query {
                0.0
            } else {
                match_score(query, text.as_ref())?
            };
            (score <= threshold).then_some((score, index))
        })
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, index)| items[index].0.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_zero_for_case_and_spacing_variants() {
        assert_eq!(distance("Main  St Library", "main st library"), 0.0);
    }

    #[test]
    fn test_abbreviated_location_is_close() {
        let d = distance("Main St Library", "Main Street Library");
        assert!(d < 0.15, "distance was {}", d);
    }

    #[test]
    fn test_unrelated_labels_are_far() {
        assert!(distance("Main St Library", "Riverside Park") > 0.3);
        assert_eq!(distance("", "Park"), 1.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [("Music", "Musical"), ("Kids", "Kid Friendly"), ("ab", "ba")];
        for (a, b) in pairs {
            assert_eq!(distance(a, b), distance(b, a));
        }
    }

    #[test]
    fn test_dedupe_keeps_first_representative() {
        let items = ["Main St Library", "Park", "Main Street Library", "park", "Senior Center"];
        assert_eq!(
            dedupe(&items, 0.15),
            vec!["Main St Library", "Park", "Senior Center"]
        );
    }

    #[test]
    fn test_dedupe_zero_threshold_only_merges_identical() {
        let items = ["Music", "Musical", "music"];
        assert_eq!(dedupe(&items, 0.0), vec!["Music", "Musical"]);
    }

    #[test]
    fn test_dedupe_empty() {
        let items: [&str; 0] = [];
        assert!(dedupe(&items, 0.2).is_empty());
    }

    #[test]
    fn test_match_score_substring() {
        assert_eq!(match_score("music", "Library Music Hour"), Some(0.0));
        assert_eq!(match_score("", "Library Music Hour"), None);
    }

    #[test]
    fn test_match_score_tolerates_typos() {
        let score = match_score("musc", "Library Music Hour").unwrap();
        assert!(score <= 0.3, "score was {}", score);
        let score = match_score("piano", "Picnic in the Park").unwrap();
        assert!(score > 0.3, "score was {}", score);
    }

    #[test]
    fn test_matches_exact_and_fuzzy() {
        let corpus = ["Main Street Library"];
        assert!(matches(&corpus, "Main Street Library", 0.0));
        assert!(matches(&corpus, "Main St Library", 0.3));
        assert!(!matches(&corpus, "Riverside Park", 0.3));
    }

    #[test]
    fn test_matches_empty_inputs() {
        let empty: [&str; 0] = [];
        assert!(!matches(&empty, "Park", 0.3));
        assert!(!matches(&["Park"], "", 0.3));
        assert!(matches(&["Park", ""], "", 0.0));
    }

    #[test]
    fn test_rank_orders_best_first() {
        let items = [
            (0, "Music by the Tracks"),
            (1, "Dance Club"),
            (2, "Musc Night"),
            (3, "Library Music Hour"),
        ];
        assert_eq!(rank(&items, "music", 0.3), vec![0, 3, 2]);
    }

    #[test]
    fn test_rank_empty_query() {
        let items = [(0, "Dance Club")];
        assert!(rank(&items, "", 0.3).is_empty());
    }
}
