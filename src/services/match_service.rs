//! Per-line match cascade.
//!
//! A [`Matcher`] holds one prepared keyword and an ordered list of
//! [`MatchStrategy`] objects. Strategies run in priority order and the first
//! one that returns a candidate wins. The rule-based strategies only return a
//! candidate on a definitive hit; the fuzzy strategy always returns one, so it
//! terminates the default cascade.

use std::cell::OnceCell;

use regex::{Regex, RegexBuilder};

use crate::config::MatchConfig;
use crate::error::AppError;
use crate::models::search::MatchCandidate;
use crate::services::normalize_service::normalize_scientific;
use crate::services::similarity_service::{ngram_similarity, token_similarity};
use crate::services::tokenize_service::tokenize;

/// A search keyword compiled once per run.
#[derive(Debug, Clone)]
pub struct Keyword {
    raw: String,
    normalized: String,
    exact: Regex,
    abbreviated: Regex,
}

impl Keyword {
    pub fn new(raw: &str) -> Result<Self, AppError> {
        let normalized = normalize_scientific(raw);
        if normalized.is_empty() {
            return Err(AppError::Usage(format!(
                "keyword {raw:?} has no searchable characters"
            )));
        }

        let exact = RegexBuilder::new(&regex::escape(raw))
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::Usage(format!("keyword is not searchable: {e}")))?;
        let abbreviated = RegexBuilder::new(&abbreviation_pattern(raw))
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::Usage(format!("keyword is not searchable: {e}")))?;

        Ok(Self {
            raw: raw.to_string(),
            normalized,
            exact,
            abbreviated,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Every keyword character, each optionally followed by a period and
/// whitespace, so "ecoli" also matches "E. coli".
fn abbreviation_pattern(keyword: &str) -> String {
    let chars: Vec<String> = keyword
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    let mut pattern = chars.join(r"\.?\s*");
    pattern.push_str(r"\.?");
    pattern
}

/// One line of page text, with derived forms computed on first use.
pub struct LineContext<'a> {
    text: &'a str,
    normalized: OnceCell<String>,
    tokens: OnceCell<Vec<String>>,
}

impl<'a> LineContext<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            normalized: OnceCell::new(),
            tokens: OnceCell::new(),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn normalized(&self) -> &str {
        self.normalized.get_or_init(|| normalize_scientific(self.text))
    }

    pub fn tokens(&self) -> &[String] {
        self.tokens.get_or_init(|| tokenize(self.text))
    }
}

pub trait MatchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(&self, line: &LineContext<'_>, keyword: &Keyword) -> Option<MatchCandidate>;
}

/// Case-insensitive verbatim occurrence, reported with the line's casing.
pub struct ExactStrategy {
    pub score: f64,
}

impl MatchStrategy for ExactStrategy {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn attempt(&self, line: &LineContext<'_>, keyword: &Keyword) -> Option<MatchCandidate> {
        keyword
            .exact
            .find(line.text())
            .map(|m| MatchCandidate::new(self.score, m.as_str()))
    }
}

/// Containment after scientific-name normalization ("E. coli" vs "ecoli").
pub struct NormalizedStrategy {
    pub score: f64,
}

impl MatchStrategy for NormalizedStrategy {
    fn name(&self) -> &'static str {
        "normalized"
    }

    fn attempt(&self, line: &LineContext<'_>, keyword: &Keyword) -> Option<MatchCandidate> {
        if !line.normalized().contains(keyword.normalized()) {
            return None;
        }
        keyword
            .abbreviated
            .find_iter(line.text())
            .find(|m| normalize_scientific(m.as_str()) == keyword.normalized())
            .map(|m| MatchCandidate::new(self.score, m.as_str()))
    }
}

pub struct TokenStrategy {
    pub score: f64,
}

impl MatchStrategy for TokenStrategy {
    fn name(&self) -> &'static str {
        "token"
    }

    fn attempt(&self, line: &LineContext<'_>, keyword: &Keyword) -> Option<MatchCandidate> {
        line.tokens()
            .iter()
            .find(|token| normalize_scientific(token) == keyword.normalized())
            .map(|token| MatchCandidate::new(self.score, token.as_str()))
    }
}

/// Best token-level fuzzy score, overridden by character n-gram similarity
/// when the whole line scores higher. Always produces a candidate.
pub struct FuzzyStrategy {
    pub ngram_size: usize,
    pub min_token_len: usize,
    pub max_span_words: usize,
}

impl FuzzyStrategy {
    fn best_span(&self, text: &str, keyword: &Keyword) -> Option<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut best_score = 0.0f64;
        let mut best = None;

        for start in 0..words.len() {
            let widest = self.max_span_words.min(words.len() - start);
            for width in 1..=widest {
                let phrase = words[start..start + width].join(" ");
                let score = ngram_similarity(&phrase, keyword.raw(), self.ngram_size);
                if score > best_score {
                    best_score = score;
                    best = Some(phrase);
                }
            }
        }
        best
    }
}

impl MatchStrategy for FuzzyStrategy {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn attempt(&self, line: &LineContext<'_>, keyword: &Keyword) -> Option<MatchCandidate> {
        let mut best_score = 0.0f64;
        let mut best_match: Option<String> = None;

        for token in line.tokens() {
            if token.chars().count() <= self.min_token_len {
                continue;
            }
            let score = token_similarity(token, keyword.normalized());
            if score > best_score {
                best_score = score;
                best_match = Some(token.clone());
            }
        }

        let line_score = ngram_similarity(line.text(), keyword.raw(), self.ngram_size);
        if line_score > best_score {
            best_score = line_score;
            best_match = self.best_span(line.text(), keyword).or(best_match);
        }

        Some(MatchCandidate {
            score: best_score,
            matched_text: best_match,
        })
    }
}

pub fn default_strategies(config: &MatchConfig) -> Vec<Box<dyn MatchStrategy>> {
    vec![
        Box::new(ExactStrategy {
            score: config.exact_score,
        }),
        Box::new(NormalizedStrategy {
            score: config.normalized_score,
        }),
        Box::new(TokenStrategy {
            score: config.token_score,
        }),
        Box::new(FuzzyStrategy {
            ngram_size: config.ngram_size,
            min_token_len: config.min_fuzzy_token_len,
            max_span_words: config.max_span_words,
        }),
    ]
}

pub struct Matcher {
    keyword: Keyword,
    strategies: Vec<Box<dyn MatchStrategy>>,
    threshold: f64,
}

impl Matcher {
    pub fn new(keyword: &str, config: &MatchConfig) -> Result<Self, AppError> {
        Ok(Self::with_strategies(
            Keyword::new(keyword)?,
            default_strategies(config),
            config.acceptance_threshold,
        ))
    }

    pub fn with_strategies(
        keyword: Keyword,
        strategies: Vec<Box<dyn MatchStrategy>>,
        threshold: f64,
    ) -> Self {
        Self {
            keyword,
            strategies,
            threshold,
        }
    }

    pub fn keyword(&self) -> &Keyword {
        &self.keyword
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn is_accepted(&self, candidate: &MatchCandidate) -> bool {
        candidate.score >= self.threshold
    }

    pub fn advanced_match(&self, line: &str) -> MatchCandidate {
        let context = LineContext::new(line);
        self.strategies
            .iter()
            .find_map(|strategy| strategy.attempt(&context, &self.keyword))
            .unwrap_or_else(MatchCandidate::none)
    }
}

/// Runs the default cascade once. Prefer building a [`Matcher`] when
/// scanning more than one line.
pub fn advanced_match(line: &str, keyword: &str) -> MatchCandidate {
    match Matcher::new(keyword, &MatchConfig::default()) {
        Ok(matcher) => matcher.advanced_match(line),
        Err(_) => MatchCandidate::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(candidate: &MatchCandidate) -> &str {
        candidate.matched_text.as_deref().unwrap_or("")
    }

    #[test]
    fn verbatim_keyword_scores_100_with_line_casing() {
        let candidate = advanced_match("Training a NEURAL network today", "neural network");
        assert_eq!(candidate.score, 100.0);
        assert_eq!(matched(&candidate), "NEURAL network");
    }

    #[test]
    fn keyword_with_regex_metacharacters_matches_literally() {
        let candidate = advanced_match("cost is $5 (approx.)", "$5 (approx.)");
        assert_eq!(candidate.score, 100.0);
        assert_eq!(matched(&candidate), "$5 (approx.)");
    }

    #[test]
    fn abbreviated_line_matches_folded_keyword() {
        let candidate = advanced_match("isolates of E. coli were cultured", "ecoli");
        assert!(candidate.score >= 95.0);
        assert_eq!(candidate.score, 95.0);
        assert_eq!(matched(&candidate), "E. coli");
    }

    #[test]
    fn folded_line_matches_abbreviated_keyword() {
        let candidate = advanced_match("isolates of ecoli were cultured", "E. coli");
        assert_eq!(candidate.score, 95.0);
        assert_eq!(matched(&candidate), "ecoli");
    }

    #[test]
    fn compact_abbreviation_matches_spaced_keyword() {
        let candidate = advanced_match("culture of E.coli bacteria", "E. coli");
        assert_eq!(candidate.score, 95.0);
        assert_eq!(matched(&candidate), "E.coli");
    }

    #[test]
    fn whitespace_variant_is_found_by_normalized_strategy() {
        let candidate = advanced_match("a neural  network layer", "Neural Network");
        assert_eq!(candidate.score, 95.0);
        assert_eq!(matched(&candidate), "neural  network");
    }

    #[test]
    fn near_miss_falls_through_to_fuzzy() {
        let candidate = advanced_match("the networc was trained", "network");
        assert!(candidate.score >= 85.0 && candidate.score < 90.0);
        assert_eq!(matched(&candidate), "networc");
    }

    #[test]
    fn transposed_letters_are_accepted_by_fuzzy() {
        let candidate = advanced_match("the netwrok was trained", "network");
        assert!(candidate.score >= 85.0 && candidate.score < 90.0);
        assert_eq!(matched(&candidate), "netwrok");
    }

    #[test]
    fn unrelated_line_scores_low() {
        let candidate = advanced_match("quarterly revenue grew", "mitochondria");
        assert!(candidate.score < 85.0);
    }

    #[test]
    fn line_without_tokens_or_ngram_overlap_has_no_match() {
        let candidate = advanced_match("12 34 56", "xyz");
        assert_eq!(candidate.score, 0.0);
        assert!(candidate.matched_text.is_none());
    }

    #[test]
    fn blank_keyword_is_rejected() {
        assert!(matches!(Keyword::new(" . "), Err(AppError::Usage(_))));
        assert_eq!(advanced_match("anything", "  "), MatchCandidate::none());
    }

    #[test]
    fn cascade_order_is_fixed() {
        let matcher = Matcher::new("x", &MatchConfig::default()).unwrap();
        assert_eq!(
            matcher.strategy_names(),
            vec!["exact", "normalized", "token", "fuzzy"]
        );
    }

    #[test]
    fn configured_scores_flow_into_candidates() {
        let config = MatchConfig {
            exact_score: 99.0,
            normalized_score: 91.0,
            ..MatchConfig::default()
        };
        let matcher = Matcher::new("ecoli", &config).unwrap();
        assert_eq!(matcher.advanced_match("ecoli").score, 99.0);
        assert_eq!(matcher.advanced_match("E. coli").score, 91.0);
    }

    struct Never;

    impl MatchStrategy for Never {
        fn name(&self) -> &'static str {
            "never"
        }

        fn attempt(&self, _: &LineContext<'_>, _: &Keyword) -> Option<MatchCandidate> {
            None
        }
    }

    #[test]
    fn empty_cascade_yields_no_candidate() {
        let matcher =
            Matcher::with_strategies(Keyword::new("abc").unwrap(), vec![Box::new(Never)], 85.0);
        assert_eq!(matcher.advanced_match("abc"), MatchCandidate::none());
    }

    #[test]
    fn acceptance_uses_threshold() {
        let matcher = Matcher::new("abc", &MatchConfig::default()).unwrap();
        assert!(matcher.is_accepted(&MatchCandidate::new(85.0, "abc")));
        assert!(!matcher.is_accepted(&MatchCandidate::new(84.9, "abc")));
    }
}
