use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Scores and limits used by the match cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub acceptance_threshold: f64,
    pub exact_score: f64,
    pub normalized_score: f64,
    pub token_score: f64,
    pub ngram_size: usize,
    /// Tokens must be longer than this many characters to be fuzzy-scored.
    pub min_fuzzy_token_len: usize,
    pub max_span_words: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 85.0,
            exact_score: 100.0,
            normalized_score: 95.0,
            token_score: 90.0,
            ngram_size: 3,
            min_fuzzy_token_len: 2,
            max_span_words: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub extension: String,
    pub workers: Option<usize>,
    pub document_timeout_secs: u64,
    #[serde(rename = "match")]
    pub matching: MatchConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            extension: "pdf".to_string(),
            workers: None,
            document_timeout_secs: 120,
            matching: MatchConfig::default(),
        }
    }
}

impl SearchConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, AppError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// An explicit path must exist; the per-user default is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let m = &self.matching;
        for (name, value) in [
            ("acceptance_threshold", m.acceptance_threshold),
            ("exact_score", m.exact_score),
            ("normalized_score", m.normalized_score),
            ("token_score", m.token_score),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(AppError::Config(format!(
                    "{name} must be within 0..=100, got {value}"
                )));
            }
        }
        if m.ngram_size == 0 {
            return Err(AppError::Config("ngram_size must be at least 1".to_string()));
        }
        if m.max_span_words == 0 {
            return Err(AppError::Config(
                "max_span_words must be at least 1".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(AppError::Config("workers must be at least 1".to_string()));
        }
        if self.document_timeout_secs == 0 {
            return Err(AppError::Config(
                "document_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(AppError::Config("extension must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn document_timeout(&self) -> Duration {
        Duration::from_secs(self.document_timeout_secs)
    }

    pub fn normalized_extension(&self) -> String {
        self.extension.trim_start_matches('.').to_lowercase()
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "docfind")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
