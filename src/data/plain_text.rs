use std::path::Path;

use regex::RegexBuilder;

use crate::data::{Document, DocumentProvider};
use crate::error::AppError;
use crate::models::search::Rect;

/// Page separator written by `pdftotext` and most text dumpers.
pub const PAGE_BREAK: char = '\x0c';
pub const CHAR_WIDTH: f64 = 6.0;
pub const LINE_HEIGHT: f64 = 12.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextProvider;

impl DocumentProvider for PlainTextProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, AppError> {
        let display = path.display().to_string();
        let raw = std::fs::read(path).map_err(|e| AppError::document(&display, e))?;
        let text = String::from_utf8(raw)
            .map_err(|e| AppError::document(&display, format!("not valid UTF-8: {e}")))?;
        Ok(Box::new(TextDocument::from_text(&text)))
    }
}

/// Text pages laid out on a monospace grid, one row per line.
#[derive(Debug, Clone)]
pub struct TextDocument {
    pages: Vec<String>,
}

impl TextDocument {
    pub fn from_text(text: &str) -> Self {
        let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        Self { pages }
    }

    fn page(&self, page_index: usize) -> Result<&str, AppError> {
        self.pages.get(page_index).map(String::as_str).ok_or_else(|| {
            AppError::General(format!(
                "page {} out of range ({} pages)",
                page_index + 1,
                self.pages.len()
            ))
        })
    }
}

impl Document for TextDocument {
    fn page_count(&mut self) -> Result<usize, AppError> {
        Ok(self.pages.len())
    }

    fn page_text(&mut self, page_index: usize) -> Result<String, AppError> {
        self.page(page_index).map(str::to_string)
    }

    fn find_rects(&mut self, page_index: usize, literal: &str) -> Result<Vec<Rect>, AppError> {
        let page = self.page(page_index)?;
        if literal.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = RegexBuilder::new(&regex::escape(literal))
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::General(format!("unsearchable literal: {e}")))?;

        let mut rects = Vec::new();
        for (row, line) in page.split('\n').enumerate() {
            for m in pattern.find_iter(line) {
                let col = line[..m.start()].chars().count();
                let width = m.as_str().chars().count();
                rects.push(Rect::new(
                    col as f64 * CHAR_WIDTH,
                    row as f64 * LINE_HEIGHT,
                    (col + width) as f64 * CHAR_WIDTH,
                    (row + 1) as f64 * LINE_HEIGHT,
                ));
            }
        }
        Ok(rects)
    }
}
