pub mod search_commands;
pub mod viewer_commands;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Parser)]
#[command(
    name = "docfind",
    version,
    about = "Fuzzy keyword search across a folder of documents",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Log progress details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub search: SearchArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open a document in the system viewer at the given page
    Open {
        document: PathBuf,
        page: usize,
    },
}

#[derive(Debug, Default, Args)]
pub struct SearchArgs {
    /// Directory searched recursively
    pub root: Option<PathBuf>,

    /// Keyword or phrase to look for
    pub keyword: Option<String>,

    /// TOML configuration file
    #[arg(long, env = "DOCFIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minimum confidence (0-100) for a match to be reported
    #[arg(long, env = "DOCFIND_THRESHOLD")]
    pub threshold: Option<f64>,

    /// Documents scanned in parallel (defaults to available cores)
    #[arg(long, env = "DOCFIND_WORKERS")]
    pub workers: Option<usize>,

    /// Per-document scan limit in seconds
    #[arg(long, env = "DOCFIND_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Document file extension to search for
    #[arg(long, env = "DOCFIND_EXTENSION")]
    pub extension: Option<String>,

    /// Read plain-text page dumps (form feed between pages) instead of PDFs
    #[arg(long)]
    pub text: bool,
}

#[derive(Debug, Serialize)]
struct ErrorLine<'a, E: Serialize + ?Sized> {
    error: &'a E,
}

/// Writes one JSON document per line and flushes, so a reading process sees
/// each message as soon as it is produced.
pub fn emit_line<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn emit_stdout<T: Serialize>(value: &T) {
    let _ = emit_line(std::io::stdout().lock(), value);
}

pub fn emit_error<E: Serialize + ?Sized>(error: &E) {
    let _ = emit_line(std::io::stderr().lock(), &ErrorLine { error });
}

/// Runs the parsed command line and returns the process exit status.
pub async fn run(cli: Cli) -> i32 {
    let result = match cli.command {
        Some(Command::Open { document, page }) => viewer_commands::open(&document, page),
        None => search_commands::search(cli.search).await,
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            err.exit_code()
        }
    }
}
