//! Corpus-wide search: discover documents, scan them on a bounded worker
//! pool, and merge results on the calling task as scans complete.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::SearchConfig;
use crate::data::DocumentProvider;
use crate::error::AppError;
use crate::models::file_entry::DocumentEntry;
use crate::models::search::{
    AcceptedMatch, DocumentFailure, ProgressEvent, RunSummary, SearchEvent, SearchOutcome,
};
use crate::services::discovery_service;
use crate::services::match_service::Matcher;
use crate::services::scan_service;

type ScanResult = (DocumentEntry, Result<Vec<AcceptedMatch>, AppError>);

fn progress_percent(completed: usize, total: usize) -> u8 {
    (completed * 100 / total).min(100) as u8
}

/// Stable sort by confidence, highest first. Equal confidences keep merge
/// order: earlier-completed documents first, then page and line order.
pub fn rank_results(results: &mut [AcceptedMatch]) {
    results.sort_by(|a, b| b.confidence.cmp(&a.confidence));
}

pub fn summarize(
    results: &[AcceptedMatch],
    total_files: usize,
    failed_files: usize,
    keyword: &str,
    started_at: chrono::DateTime<chrono::Utc>,
    elapsed_ms: u64,
) -> RunSummary {
    let mut files: Vec<&str> = results.iter().map(|r| r.file.as_str()).collect();
    files.sort_unstable();
    files.dedup();

    RunSummary {
        total_files_searched: total_files,
        files_with_matches: files.len(),
        total_matches: results.len(),
        failed_files,
        keyword: keyword.to_string(),
        started_at: started_at.to_rfc3339(),
        finished_at: chrono::Utc::now().to_rfc3339(),
        elapsed_ms,
    }
}

/// Scans `documents` with at most `config.worker_count()` scans in flight.
/// `on_event` runs on the calling task only, once per finished document.
pub async fn search_documents<F>(
    documents: Vec<DocumentEntry>,
    keyword: &str,
    config: &SearchConfig,
    provider: Arc<dyn DocumentProvider>,
    mut on_event: F,
) -> Result<SearchOutcome, AppError>
where
    F: FnMut(SearchEvent),
{
    config.validate()?;
    let started_at = chrono::Utc::now();
    let clock = Instant::now();
    let matcher = Arc::new(Matcher::new(keyword, &config.matching)?);

    let total = documents.len();
    let workers = config.worker_count();
    let timeout = config.document_timeout();
    let timeout_secs = config.document_timeout_secs;
    tracing::info!(keyword, documents = total, workers, "starting search");

    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks: JoinSet<ScanResult> = JoinSet::new();

    for entry in documents {
        let semaphore = semaphore.clone();
        let provider = provider.clone();
        let matcher = matcher.clone();

        tasks.spawn(async move {
            let permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let err = AppError::Run(format!("worker pool closed: {e}"));
                    return (entry, Err(err));
                }
            };

            let scan_entry = entry.clone();
            let scan = tokio::task::spawn_blocking(move || {
                // held until the scan really finishes, even past a timeout
                let _permit = permit;
                scan_service::scan_document(provider.as_ref(), &scan_entry, &matcher)
            });

            let outcome = match tokio::time::timeout(timeout, scan).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_err)) => Err(AppError::document(
                    &entry.path,
                    format!("scan aborted: {join_err}"),
                )),
                Err(_) => Err(AppError::Timeout {
                    path: entry.path.clone(),
                    timeout_secs,
                }),
            };
            (entry, outcome)
        });
    }

    let mut results: Vec<AcceptedMatch> = Vec::new();
    let mut failures: Vec<DocumentFailure> = Vec::new();
    let mut completed = 0usize;

    while let Some(joined) = tasks.join_next().await {
        let (entry, outcome) =
            joined.map_err(|e| AppError::Run(format!("dispatch failed: {e}")))?;

        match outcome {
            Ok(matches) => results.extend(matches),
            Err(err) if !err.is_document_scoped() => return Err(err),
            Err(err) => {
                tracing::warn!(path = %entry.path, error = %err, "document scan failed");
                let failure = DocumentFailure {
                    path: entry.path,
                    error: err.to_string(),
                };
                on_event(SearchEvent::DocumentFailed(failure.clone()));
                failures.push(failure);
            }
        }

        completed += 1;
        on_event(SearchEvent::Progress(ProgressEvent {
            progress: progress_percent(completed, total),
        }));
    }

    rank_results(&mut results);
    let summary = summarize(
        &results,
        total,
        failures.len(),
        keyword,
        started_at,
        clock.elapsed().as_millis() as u64,
    );
    tracing::info!(
        matches = summary.total_matches,
        files_with_matches = summary.files_with_matches,
        failed = summary.failed_files,
        "search finished"
    );

    Ok(SearchOutcome {
        results,
        summary,
        failures,
    })
}

/// Discovers every document under `root` and searches them for `keyword`.
pub async fn search<F>(
    root: &Path,
    keyword: &str,
    config: &SearchConfig,
    provider: Arc<dyn DocumentProvider>,
    on_event: F,
) -> Result<SearchOutcome, AppError>
where
    F: FnMut(SearchEvent),
{
    if keyword.trim().is_empty() {
        return Err(AppError::Usage("keyword must not be empty".to_string()));
    }
    config.validate()?;
    let documents = discovery_service::discover_documents(root, &config.normalized_extension())?;
    search_documents(documents, keyword, config, provider, on_event).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::Rect;

    fn accepted(file: &str, page: usize, confidence: u8) -> AcceptedMatch {
        AcceptedMatch {
            file: file.to_string(),
            file_name: file.to_string(),
            page,
            found: true,
            match_source: "content".to_string(),
            confidence,
            found_word: "w".to_string(),
            positions: vec![Rect::new(0.0, 0.0, 1.0, 1.0)],
            context: "w".to_string(),
        }
    }

    #[test]
    fn progress_is_floored_percentage() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(3, 3), 100);
    }

    #[test]
    fn ranking_is_stable_for_equal_confidence() {
        let mut results = vec![
            accepted("first", 1, 90),
            accepted("second", 1, 100),
            accepted("third", 1, 90),
            accepted("fourth", 1, 100),
        ];
        rank_results(&mut results);
        let order: Vec<&str> = results.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(order, vec!["second", "fourth", "first", "third"]);
    }

    #[test]
    fn summary_counts_distinct_files() {
        let results = vec![
            accepted("/a.pdf", 1, 100),
            accepted("/a.pdf", 2, 95),
            accepted("/b.pdf", 1, 90),
        ];
        let summary = summarize(&results, 5, 1, "kw", chrono::Utc::now(), 12);
        assert_eq!(summary.total_files_searched, 5);
        assert_eq!(summary.files_with_matches, 2);
        assert_eq!(summary.total_matches, 3);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.keyword, "kw");
        assert_eq!(summary.elapsed_ms, 12);
    }

    #[tokio::test]
    async fn blank_keyword_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider: Arc<dyn DocumentProvider> = Arc::new(crate::data::PlainTextProvider);
        let err = search(dir.path(), "   ", &SearchConfig::default(), provider, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Usage(_)));
    }
}
