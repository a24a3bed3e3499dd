use std::sync::LazyLock;

use regex::Regex;

static ABBREVIATION_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])\.\s*([a-z])").expect("valid abbreviation pattern"));
static SPACE_OR_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s.]+").expect("valid separator pattern"));

/// Canonical form used by every stage of the match cascade: lowercase, with
/// "E. coli" style abbreviations folded and all whitespace and periods removed.
pub fn normalize_scientific(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let joined = ABBREVIATION_JOIN.replace_all(&lowered, "${1}${2}");
    SPACE_OR_PERIOD.replace_all(&joined, "").into_owned()
}

/// Case-folded text with whitespace, periods and commas removed.
pub fn normalize_basic(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != ',')
        .collect()
}
