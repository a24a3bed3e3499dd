use std::sync::LazyLock;

use regex::Regex;

/// Candidate span classes, applied in this order. Their results are
/// concatenated, so a span may appear more than once.
static TOKEN_CLASSES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // words, allowing internal apostrophes, periods and hyphens
        Regex::new(r"\b[A-Za-z]+(?:['.-]\w+)*\b").expect("valid word pattern"),
        // "E. coli"
        Regex::new(r"\b[A-Za-z]\.\s?[A-Za-z][a-z]+\b").expect("valid scientific pattern"),
        // greedy multi-word phrases
        Regex::new(r"\b(?:\w+[\s.-])+\w+\b").expect("valid phrase pattern"),
        // "U.S", "e.g"
        Regex::new(r"\b(?:[A-Za-z]\.)+[A-Za-z]?[a-z]*\b").expect("valid abbreviation pattern"),
    ]
});

pub fn tokenize(line: &str) -> Vec<String> {
    TOKEN_CLASSES
        .iter()
        .flat_map(|class| class.find_iter(line).map(|m| m.as_str().to_string()))
        .collect()
}
