use similar::TextDiff;

/// Minimum similarity ratio (exclusive) for a fuzzy match to be accepted.
pub const DEFAULT_FUZZY_THRESHOLD: f32 = 0.8;

/// Character-level similarity ratio in `[0, 1]`: `2 * matches / (len_a + len_b)`.
///
/// Two empty strings are identical (1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f32 {
    TextDiff::from_chars(a, b).ratio()
}

/// Upper bound of [`similarity_ratio`] given only the two lengths.
fn ratio_upper_bound(len_a: usize, len_b: usize) -> f32 {
    let total = len_a + len_b;
    if total == 0 {
        return 1.0;
    }
    2.0 * len_a.min(len_b) as f32 / total as f32
}

/// Best match for `term` in `vocabulary` whose ratio exceeds `threshold`.
///
/// `vocabulary` must be sorted so that equal ratios resolve to the smallest
/// term.
pub(crate) fn best_match<'a>(
    term: &str,
    vocabulary: &'a [String],
    threshold: f32,
) -> Option<(&'a str, f32)> {
    let term_len = term.chars().count();
    let mut best: Option<(&'a str, f32)> = None;

    for candidate in vocabulary {
        let floor = best.map_or(threshold, |(_, ratio)| ratio.max(threshold));
        if ratio_upper_bound(term_len, candidate.chars().count()) <= floor {
            continue;
        }
        let ratio = similarity_ratio(term, candidate);
        if ratio > floor {
            best = Some((candidate.as_str(), ratio));
        }
    }

    best
}
