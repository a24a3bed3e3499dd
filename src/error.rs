use serde::Serialize;

/// Exit status for bad invocations: missing arguments, blank keyword,
/// a root that is not a directory, or an invalid configuration.
pub const EXIT_USAGE: i32 = 2;
/// Exit status when enumeration or dispatch fails and the run is aborted.
pub const EXIT_RUN: i32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Usage: {0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Error processing {path}: {reason}")]
    Document { path: String, reason: String },

    #[error("Error processing {path}: scan exceeded {timeout_secs}s")]
    Timeout { path: String, timeout_secs: u64 },

    #[error("Position lookup failed for {term:?} on page {page}: {reason}")]
    PositionLookup {
        term: String,
        page: usize,
        reason: String,
    },

    #[error("Error searching documents: {0}")]
    Run(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    General(String),
}

impl AppError {
    pub fn document(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Document {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors that abort the whole run map to a non-zero status; everything
    /// else is recovered before it reaches the entry point.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Config(_) | Self::Toml(_) => EXIT_USAGE,
            _ => EXIT_RUN,
        }
    }

    pub fn is_document_scoped(&self) -> bool {
        matches!(
            self,
            Self::Document { .. } | Self::Timeout { .. } | Self::PositionLookup { .. }
        )
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_and_run_errors_have_distinct_exit_codes() {
        let usage = AppError::Usage("missing keyword".to_string());
        let run = AppError::Run("walk failed".to_string());
        assert_eq!(usage.exit_code(), EXIT_USAGE);
        assert_eq!(run.exit_code(), EXIT_RUN);
        assert_ne!(usage.exit_code(), run.exit_code());
    }

    #[test]
    fn document_errors_are_document_scoped() {
        assert!(AppError::document("/a.pdf", "broken xref").is_document_scoped());
        assert!(AppError::Timeout {
            path: "/a.pdf".to_string(),
            timeout_secs: 5,
        }
        .is_document_scoped());
        assert!(!AppError::Run("x".to_string()).is_document_scoped());
    }

    #[test]
    fn serializes_as_display_string() {
        let err = AppError::document("/docs/a.pdf", "not a pdf");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Error processing /docs/a.pdf: not a pdf\"");
    }
}
