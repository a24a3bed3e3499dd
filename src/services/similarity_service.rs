use std::collections::HashSet;

use crate::services::normalize_service::normalize_scientific;

fn char_ngrams(text: &str, n: usize) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return HashSet::new();
    }
    if chars.len() < n {
        return HashSet::from([text.to_string()]);
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}

/// Jaccard index of the character n-gram sets of both normalized inputs,
/// scaled to 0..=100.
pub fn ngram_similarity(a: &str, b: &str, n: usize) -> f64 {
    let grams_a = char_ngrams(&normalize_scientific(a), n);
    let grams_b = char_ngrams(&normalize_scientific(b), n);
    if grams_a.is_empty() || grams_b.is_empty() {
        return 0.0;
    }

    let intersection = grams_a.intersection(&grams_b).count();
    let union = grams_a.union(&grams_b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64 * 100.0
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Insertion/deletion similarity of two already-normalized strings,
/// `2 * lcs / (len_a + len_b)` scaled to 0..=100. A transposition costs two
/// edits out of the combined length.
pub fn full_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    (2 * lcs_len(&a, &b)) as f64 / total as f64 * 100.0
}

/// Best `full_ratio` between the shorter string and any equally long window
/// of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = short.chars().count();
    if short_len == 0 {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let long_chars: Vec<char> = long.chars().collect();
    let mut best = 0.0f64;
    for window in long_chars.windows(short_len) {
        let candidate: String = window.iter().collect();
        let score = full_ratio(short, &candidate);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

pub fn token_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_scientific(a);
    let b = normalize_scientific(b);
    full_ratio(&a, &b).max(partial_ratio(&a, &b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ngram_identity_is_100() {
        for text in ["neural network", "ab", "E. coli", "x"] {
            assert_eq!(ngram_similarity(text, text, 3), 100.0, "{text}");
        }
    }

    #[test]
    fn ngram_disjoint_is_zero() {
        assert_eq!(ngram_similarity("abcdef", "uvwxyz", 3), 0.0);
    }

    #[test]
    fn ngram_ignores_case_and_spacing() {
        assert_eq!(ngram_similarity("Neural  Network", "neural network", 3), 100.0);
        assert_eq!(ngram_similarity("E. coli", "ecoli", 3), 100.0);
    }

    #[test]
    fn ngram_partial_overlap() {
        // {abc, bcd} vs {bcd, cde}
        let score = ngram_similarity("abcd", "bcde", 3);
        assert!((score - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn ngram_empty_input_is_zero() {
        assert_eq!(ngram_similarity("", "abc", 3), 0.0);
        assert_eq!(ngram_similarity("abc", " . ", 3), 0.0);
    }

    #[test]
    fn short_strings_are_their_own_ngram() {
        assert_eq!(ngram_similarity("ab", "AB", 3), 100.0);
        assert_eq!(ngram_similarity("ab", "abc", 3), 0.0);
    }

    #[test]
    fn token_similarity_identity_and_disjoint() {
        assert_eq!(token_similarity("network", "Network"), 100.0);
        assert!(token_similarity("aaaa", "zzzz") < 1.0);
    }

    #[test]
    fn full_ratio_is_symmetric() {
        let ab = full_ratio("kitten", "sitting");
        let ba = full_ratio("sitting", "kitten");
        assert_eq!(ab, ba);
        assert!(ab > 0.0 && ab < 100.0);
    }

    #[test]
    fn partial_ratio_finds_embedded_substring() {
        assert_eq!(partial_ratio("network", "neuralnetworks"), 100.0);
        assert!(token_similarity("networks", "network") >= 85.0);
    }

    #[test]
    fn single_transposition_or_substitution_clears_acceptance() {
        let transposed = token_similarity("netwrok", "network");
        assert!((transposed - 1200.0 / 14.0).abs() < 1e-9);
        assert!(transposed >= 85.0);
        assert!(token_similarity("networc", "network") >= 85.0);
    }

    #[test]
    fn full_ratio_counts_insertions_and_deletions() {
        // lcs("kitten", "sitting") = "ittn"
        assert!((full_ratio("kitten", "sitting") - 800.0 / 13.0).abs() < 1e-9);
        assert_eq!(full_ratio("", ""), 100.0);
        assert_eq!(full_ratio("abc", ""), 0.0);
    }
}
