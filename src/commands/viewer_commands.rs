use std::path::Path;

use serde::Serialize;

use crate::commands::emit_stdout;
use crate::error::AppError;
use crate::shell::viewer;

#[derive(Debug, Serialize)]
struct PageLine {
    page: usize,
}

/// Echoes the requested page for the calling process, then hands the
/// document to the platform viewer.
pub fn open(document: &Path, page: usize) -> Result<(), AppError> {
    if page == 0 {
        return Err(AppError::Usage("pages are numbered from 1".to_string()));
    }
    emit_stdout(&PageLine { page });
    viewer::open_at_page(document, page)
}
