use crate::error::AppError;

/// Characters `cmd.exe` would interpret when a path is handed to `start`.
const CMD_METACHARACTERS: &[&str] = &["&", "|", "^", "%", "\"", "<", ">", "`", "$("];

pub fn validate_path(path: &str) -> Result<(), AppError> {
    if path.trim().is_empty() {
        return Err(AppError::Usage("path is empty".to_string()));
    }
    if path.chars().any(|c| c.is_control()) {
        return Err(AppError::Usage(
            "path contains control characters".to_string(),
        ));
    }
    Ok(())
}

/// Stricter check for paths that pass through a command interpreter.
pub fn validate_shell_safe(path: &str) -> Result<(), AppError> {
    validate_path(path)?;
    for pattern in CMD_METACHARACTERS {
        if path.contains(pattern) {
            return Err(AppError::Usage(format!(
                "path contains forbidden pattern: {pattern}"
            )));
        }
    }
    Ok(())
}
