use std::sync::Arc;

use crate::commands::{emit_error, emit_stdout, SearchArgs};
use crate::config::SearchConfig;
use crate::data::{DocumentProvider, PlainTextProvider};
use crate::error::AppError;
use crate::models::search::SearchEvent;
use crate::services::search_service;

const TEXT_EXTENSION: &str = "txt";

impl SearchArgs {
    /// Layers flag and environment overrides on top of the file config.
    pub fn apply(&self, config: &mut SearchConfig) {
        if let Some(threshold) = self.threshold {
            config.matching.acceptance_threshold = threshold;
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(secs) = self.timeout_secs {
            config.document_timeout_secs = secs;
        }
        match &self.extension {
            Some(extension) => config.extension = extension.clone(),
            None if self.text => config.extension = TEXT_EXTENSION.to_string(),
            None => {}
        }
    }

    pub fn resolve_config(&self) -> Result<SearchConfig, AppError> {
        let mut config = SearchConfig::load(self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn provider(&self) -> Arc<dyn DocumentProvider> {
        #[cfg(feature = "pdf")]
        if !self.text {
            return Arc::new(crate::data::PdfProvider);
        }
        Arc::new(PlainTextProvider)
    }
}

pub async fn search(args: SearchArgs) -> Result<(), AppError> {
    let (Some(root), Some(keyword)) = (args.root.as_deref(), args.keyword.as_deref()) else {
        return Err(AppError::Usage(
            "Please provide a directory path and a keyword".to_string(),
        ));
    };

    let config = args.resolve_config()?;
    let provider = args.provider();

    let outcome = search_service::search(root, keyword, &config, provider, |event| match event {
        SearchEvent::Progress(progress) => emit_stdout(&progress),
        SearchEvent::DocumentFailed(failure) => emit_error(failure.error.as_str()),
    })
    .await?;

    emit_stdout(&outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn flags_override_file_config() {
        let args = SearchArgs {
            threshold: Some(70.0),
            workers: Some(3),
            timeout_secs: Some(9),
            extension: Some("PDF".to_string()),
            ..Default::default()
        };
        let mut config = SearchConfig::default();
        args.apply(&mut config);
        assert_eq!(config.matching.acceptance_threshold, 70.0);
        assert_eq!(config.workers, Some(3));
        assert_eq!(config.document_timeout_secs, 9);
        assert_eq!(config.normalized_extension(), "pdf");
    }

    #[test]
    fn text_mode_defaults_to_txt_documents() {
        let args = SearchArgs {
            text: true,
            ..Default::default()
        };
        let mut config = SearchConfig::default();
        args.apply(&mut config);
        assert_eq!(config.extension, "txt");
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        let args = SearchArgs {
            config: Some(path),
            threshold: Some(140.0),
            ..Default::default()
        };
        assert!(matches!(args.resolve_config(), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn missing_keyword_is_usage_error() {
        let args = SearchArgs {
            root: Some(PathBuf::from("/docs")),
            ..Default::default()
        };
        assert!(matches!(search(args).await, Err(AppError::Usage(_))));
    }
}
