use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::AppError;
use crate::shell::safety::{validate_path, validate_shell_safe};

const ACROBAT_PATHS: &[&str] = &[
    r"C:\Program Files (x86)\Adobe\Acrobat Reader DC\Reader\AcroRd32.exe",
    r"C:\Program Files\Adobe\Acrobat Reader DC\Reader\Acrobat.exe",
    r"C:\Program Files (x86)\Adobe\Acrobat DC\Acrobat\AcroRd32.exe",
    r"C:\Program Files\Adobe\Acrobat DC\Acrobat\Acrobat.exe",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Unix
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerCommand {
    pub program: String,
    pub args: Vec<String>,
}

pub fn find_acrobat() -> Option<PathBuf> {
    ACROBAT_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Only Acrobat honours the page; other viewers open the document at its
/// first page.
pub fn viewer_command(
    platform: Platform,
    document: &str,
    page: usize,
    acrobat: Option<&Path>,
) -> Result<ViewerCommand, AppError> {
    validate_path(document)?;

    let command = match (platform, acrobat) {
        (Platform::Windows, Some(exe)) => ViewerCommand {
            program: exe.display().to_string(),
            args: vec![
                "/A".to_string(),
                format!("page={page}"),
                document.to_string(),
            ],
        },
        (Platform::Windows, None) => {
            validate_shell_safe(document)?;
            ViewerCommand {
                program: "cmd".to_string(),
                args: vec![
                    "/C".to_string(),
                    "start".to_string(),
                    String::new(),
                    document.to_string(),
                ],
            }
        }
        (Platform::MacOs, _) => ViewerCommand {
            program: "open".to_string(),
            args: vec![document.to_string()],
        },
        (Platform::Unix, _) => ViewerCommand {
            program: "xdg-open".to_string(),
            args: vec![document.to_string()],
        },
    };
    Ok(command)
}

pub fn open_at_page(document: &Path, page: usize) -> Result<(), AppError> {
    if page == 0 {
        return Err(AppError::Usage("pages are numbered from 1".to_string()));
    }
    if !document.is_file() {
        return Err(AppError::Usage(format!(
            "no such document: {}",
            document.display()
        )));
    }

    let platform = Platform::current();
    let acrobat = match platform {
        Platform::Windows => find_acrobat(),
        _ => None,
    };
    let command = viewer_command(
        platform,
        &document.to_string_lossy(),
        page,
        acrobat.as_deref(),
    )?;

    tracing::info!(program = %command.program, page, "launching viewer");
    let status = Command::new(&command.program)
        .args(&command.args)
        .status()
        .map_err(|e| AppError::General(format!("cannot launch {}: {e}", command.program)))?;
    if !status.success() {
        return Err(AppError::General(format!(
            "{} exited with {status}",
            command.program
        )));
    }
    Ok(())
}
