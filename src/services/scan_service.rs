use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::data::{Document, DocumentProvider, PositionLookup};
use crate::error::AppError;
use crate::models::file_entry::DocumentEntry;
use crate::models::search::{AcceptedMatch, Rect};
use crate::services::match_service::Matcher;

const MATCH_SOURCE: &str = "content";
const MIN_FALLBACK_WORD_CHARS: usize = 3;

static SCIENTIFIC_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]\.\s?[A-Za-z]").expect("valid scientific pattern"));
static PERIOD_THEN_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z])\.\s+([A-Za-z])").expect("valid spacing pattern"));
static PERIOD_MAYBE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z])\.\s*([A-Za-z])").expect("valid period pattern"));

fn in_document(path: &str, e: AppError) -> AppError {
    match e {
        AppError::Document { .. } => e,
        other => AppError::document(path, other),
    }
}

/// Literal strings to look up for a matched span. "E. coli" is also tried
/// as "E.coli" and "E coli", since PDFs render abbreviations inconsistently.
pub fn search_terms(found: &str) -> Vec<String> {
    let mut terms = vec![found.to_string()];
    if SCIENTIFIC_SPAN.is_match(found) {
        let variants = [
            PERIOD_THEN_SPACE.replace_all(found, "${1}.${2}").into_owned(),
            PERIOD_MAYBE_SPACE.replace_all(found, "${1} ${2}").into_owned(),
        ];
        for variant in variants {
            if !terms.contains(&variant) {
                terms.push(variant);
            }
        }
    }
    terms
}

fn collect_rects(doc: &mut dyn Document, page_index: usize, term: &str, into: &mut Vec<Rect>) {
    match PositionLookup::run(doc, page_index, term) {
        PositionLookup::Found(rects) => into.extend(rects),
        PositionLookup::NotFound => {}
        PositionLookup::Failed(err) => {
            tracing::debug!(error = %err, "skipping failed position lookup");
        }
    }
}

/// Rectangles for every search term of `found`. When none of them resolve,
/// each longer word of `found` is looked up on its own.
pub fn resolve_positions(doc: &mut dyn Document, page_index: usize, found: &str) -> Vec<Rect> {
    let mut positions = Vec::new();
    for term in search_terms(found) {
        collect_rects(doc, page_index, &term, &mut positions);
    }

    if positions.is_empty() {
        for word in found
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_FALLBACK_WORD_CHARS)
        {
            collect_rects(doc, page_index, word, &mut positions);
        }
    }
    positions
}

pub fn scan_document(
    provider: &dyn DocumentProvider,
    entry: &DocumentEntry,
    matcher: &Matcher,
) -> Result<Vec<AcceptedMatch>, AppError> {
    let mut doc = provider
        .open(Path::new(&entry.path))
        .map_err(|e| in_document(&entry.path, e))?;
    let page_count = doc
        .page_count()
        .map_err(|e| in_document(&entry.path, e))?;

    let mut seen: HashSet<(usize, String)> = HashSet::new();
    let mut results = Vec::new();

    for page_index in 0..page_count {
        let text = doc
            .page_text(page_index)
            .map_err(|e| in_document(&entry.path, e))?;
        let page = page_index + 1;

        for line in text.split('\n') {
            if line.chars().count() <= 1 {
                continue;
            }

            let candidate = matcher.advanced_match(line);
            if !matcher.is_accepted(&candidate) {
                continue;
            }
            let Some(found_word) = candidate.matched_text else {
                continue;
            };
            if !seen.insert((page, found_word.clone())) {
                continue;
            }

            let positions = resolve_positions(doc.as_mut(), page_index, &found_word);
            results.push(AcceptedMatch {
                file: entry.path.clone(),
                file_name: entry.name.clone(),
                page,
                found: true,
                match_source: MATCH_SOURCE.to_string(),
                confidence: candidate.score.clamp(0.0, 100.0).floor() as u8,
                found_word,
                positions,
                context: line.trim().to_string(),
            });
        }
    }

    tracing::debug!(path = %entry.path, pages = page_count, matches = results.len(), "scanned document");
    Ok(results)
}
