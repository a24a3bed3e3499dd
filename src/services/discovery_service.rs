use std::path::Path;

use crate::error::AppError;
use crate::models::file_entry::DocumentEntry;

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Checks the root before any work starts: a missing root or a plain file
/// is bad input, an unreadable directory aborts the run.
pub fn validate_root(root: &Path) -> Result<(), AppError> {
    if !root.exists() {
        return Err(AppError::Usage(format!(
            "root directory does not exist: {}",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(AppError::Usage(format!(
            "not a directory: {}",
            root.display()
        )));
    }
    std::fs::read_dir(root)
        .map(|_| ())
        .map_err(|e| AppError::Run(format!("cannot read {}: {e}", root.display())))
}

/// Every file under `root` whose extension matches, case-insensitively,
/// dot-prefixed entries included. Symlinked files are listed but symlinked
/// directories are not descended. Unreadable subdirectories are skipped with
/// a warning.
pub fn discover_documents(root: &Path, extension: &str) -> Result<Vec<DocumentEntry>, AppError> {
    validate_root(root)?;
    let extension = extension.trim_start_matches('.');

    let mut documents = Vec::new();
    let walker = walkdir::WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(AppError::Run(format!(
                    "cannot walk {}: {err}",
                    root.display()
                )));
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && has_extension(entry.path(), extension) {
            documents.push(DocumentEntry::from_path(entry.path()));
        }
    }

    tracing::info!(root = %root.display(), count = documents.len(), "discovered documents");
    Ok(documents)
}
