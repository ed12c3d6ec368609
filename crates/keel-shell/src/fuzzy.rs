//! Fuzzy matching for "did you mean" suggestions.
//!
//! Two-stage ranking: case-insensitive prefix matches win outright;
//! otherwise candidates within Damerau-Levenshtein distance 2 are
//! offered, closest first, ties broken alphabetically. Single-character
//! names (`?`, `q`) are excluded from the distance stage so they never
//! show up as suggestions for unrelated typos.

/// Maximum edit distance for a near-miss suggestion.
const MAX_DISTANCE: usize = 2;

/// Damerau-Levenshtein distance (optimal string alignment variant):
/// insertions, deletions, substitutions, and adjacent transpositions.
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut d = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                d = d.min(dp[i - 2][j - 2] + 1);
            }
            dp[i][j] = d;
        }
    }
    dp[a.len()][b.len()]
}

/// Find the candidates closest to `input`.
///
/// Prefix matches (case-insensitive) are returned alone, sorted
/// alphabetically. With no prefix match, candidates longer than one
/// character within distance [`MAX_DISTANCE`] are returned sorted by
/// ascending distance, then alphabetically.
pub fn find_approx<I, S>(input: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let needle = input.to_lowercase();
    let mut prefix_matches = Vec::new();
    let mut near: Vec<(usize, String)> = Vec::new();

    for candidate in candidates {
        let candidate = candidate.as_ref();
        if candidate.to_lowercase().starts_with(&needle) {
            prefix_matches.push(candidate.to_string());
        } else if candidate.chars().count() > 1 {
            let distance = damerau_levenshtein(&needle, &candidate.to_lowercase());
            if distance <= MAX_DISTANCE {
                near.push((distance, candidate.to_string()));
            }
        }
    }

    if !prefix_matches.is_empty() {
        prefix_matches.sort();
        prefix_matches.dedup();
        return prefix_matches;
    }

    near.sort();
    near.dedup();
    near.into_iter().map(|(_, name)| name).collect()
}

/// Render suggestions as a ", did you mean a, b or c?" suffix.
/// Empty input renders as an empty string.
pub fn suggestions_msg(suggestions: &[String]) -> String {
    match suggestions {
        [] => String::new(),
        [only] => format!(", did you mean {only}?"),
        [head @ .., last] => format!(", did you mean {} or {last}?", head.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(damerau_levenshtein("", "abc"), 3);
        assert_eq!(damerau_levenshtein("abc", "abc"), 0);
        assert_eq!(damerau_levenshtein("kitten", "sitting"), 3);
        assert_eq!(damerau_levenshtein("stah", "stop"), 2);
        assert_eq!(damerau_levenshtein("stah", "start"), 2);
        assert_eq!(damerau_levenshtein("stah", "status"), 3);
    }

    #[test]
    fn distance_counts_transposition_once() {
        assert_eq!(damerau_levenshtein("satus", "status"), 1);
        assert_eq!(damerau_levenshtein("sttaus", "status"), 1);
    }

    #[test]
    fn prefix_matches_win() {
        let found = find_approx("st", ["status", "stop", "start", "help"]);
        assert_eq!(found, vec!["start", "status", "stop"]);
    }

    #[test]
    fn fuzzy_ranking_is_deterministic() {
        // No prefix match for "stah": start and stop are both at
        // distance 2, status at 3 is over the threshold.
        let found = find_approx("stah", ["status", "stop", "start", "help"]);
        assert_eq!(found, vec!["start", "stop"]);
    }

    #[test]
    fn single_char_names_excluded_from_fuzzy() {
        let found = find_approx("xy", ["?", "q", "xz"]);
        assert_eq!(found, vec!["xz"]);
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let found = find_approx("ST", ["status", "stop"]);
        assert_eq!(found, vec!["status", "stop"]);
    }

    #[test]
    fn suggestion_messages() {
        assert_eq!(suggestions_msg(&[]), "");
        assert_eq!(
            suggestions_msg(&["stop".to_string()]),
            ", did you mean stop?"
        );
        assert_eq!(
            suggestions_msg(&["start".to_string(), "status".to_string(), "stop".to_string()]),
            ", did you mean start, status or stop?"
        );
    }
}
