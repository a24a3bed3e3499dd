use serde::{Deserialize, Serialize};

/// Bounding rectangle of a match on a page, in the provider's page units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// Outcome of running the match cascade over one line.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub score: f64,
    pub matched_text: Option<String>,
}

impl MatchCandidate {
    pub fn new(score: f64, matched_text: impl Into<String>) -> Self {
        Self {
            score,
            matched_text: Some(matched_text.into()),
        }
    }

    pub fn none() -> Self {
        Self {
            score: 0.0,
            matched_text: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedMatch {
    pub file: String,
    pub file_name: String,
    pub page: usize,
    pub found: bool,
    #[serde(rename = "match")]
    pub match_source: String,
    pub confidence: u8,
    pub found_word: String,
    pub positions: Vec<Rect>,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub progress: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_files_searched: usize,
    pub files_with_matches: usize,
    pub total_matches: usize,
    pub failed_files: usize,
    pub keyword: String,
    pub started_at: String,
    pub finished_at: String,
    pub elapsed_ms: u64,
}

/// Everything a finished run hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<AcceptedMatch>,
    pub summary: RunSummary,
    #[serde(skip)]
    pub failures: Vec<DocumentFailure>,
}

/// Streamed to the caller while a run is in flight, in completion order.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    Progress(ProgressEvent),
    DocumentFailed(DocumentFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_match_uses_wire_field_names() {
        let m = AcceptedMatch {
            file: "/docs/a.pdf".to_string(),
            file_name: "a.pdf".to_string(),
            page: 2,
            found: true,
            match_source: "content".to_string(),
            confidence: 95,
            found_word: "E. coli".to_string(),
            positions: vec![Rect::new(1.0, 2.0, 3.0, 4.0)],
            context: "grown on E. coli plates".to_string(),
        };
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["fileName"], "a.pdf");
        assert_eq!(value["foundWord"], "E. coli");
        assert_eq!(value["match"], "content");
        assert_eq!(value["positions"][0]["x1"], 3.0);
    }

    #[test]
    fn outcome_omits_failures_from_wire_format() {
        let outcome = SearchOutcome {
            results: Vec::new(),
            summary: RunSummary {
                total_files_searched: 1,
                files_with_matches: 0,
                total_matches: 0,
                failed_files: 1,
                keyword: "x".to_string(),
                started_at: String::new(),
                finished_at: String::new(),
                elapsed_ms: 0,
            },
            failures: vec![DocumentFailure {
                path: "/a.pdf".to_string(),
                error: "bad".to_string(),
            }],
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("failures").is_none());
        assert_eq!(value["summary"]["total_files_searched"], 1);
    }
}
