//! Document access: page text extraction and on-page text positions.
//!
//! The scanner only sees the [`DocumentProvider`] and [`Document`] traits.
//! `PdfProvider` reads PDF files; `PlainTextProvider` reads text dumps with
//! form-feed page breaks and lays them out on a fixed grid.

#[cfg(feature = "pdf")]
pub mod pdf;
pub mod plain_text;

use std::path::Path;

use crate::error::AppError;
use crate::models::search::Rect;

#[cfg(feature = "pdf")]
pub use pdf::PdfProvider;
pub use plain_text::PlainTextProvider;

pub trait Document {
    fn page_count(&mut self) -> Result<usize, AppError>;

    fn page_text(&mut self, page_index: usize) -> Result<String, AppError>;

    /// Rectangles where `literal` visually appears on the page. Literal text,
    /// never a pattern; an empty result is not an error.
    fn find_rects(&mut self, page_index: usize, literal: &str) -> Result<Vec<Rect>, AppError>;
}

pub trait DocumentProvider: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, AppError>;
}

/// Result of one visual lookup for one search term.
#[derive(Debug)]
pub enum PositionLookup {
    Found(Vec<Rect>),
    NotFound,
    Failed(AppError),
}

impl PositionLookup {
    pub fn run(doc: &mut dyn Document, page_index: usize, term: &str) -> Self {
        match doc.find_rects(page_index, term) {
            Ok(rects) if rects.is_empty() => Self::NotFound,
            Ok(rects) => Self::Found(rects),
            Err(e) => Self::Failed(AppError::PositionLookup {
                term: term.to_string(),
                page: page_index + 1,
                reason: e.to_string(),
            }),
        }
    }
}
