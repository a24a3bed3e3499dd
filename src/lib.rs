//! Fuzzy keyword search across a folder of PDF documents.
//!
//! Every line of every page runs through a cascade of match strategies
//! (exact, normalized, token and n-gram fuzzy). Accepted matches carry the
//! page number, a confidence score and the on-page rectangles of the
//! matched text. Documents are scanned in parallel on a bounded pool.

pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod services;
pub mod shell;

pub use commands::{run, Cli};
pub use config::SearchConfig;
pub use error::AppError;
pub use services::match_service::{advanced_match, Matcher};
pub use services::search_service::{search, search_documents};
