use std::path::Path;

use pdf_oxide::search::{SearchOptions, TextSearcher};
use pdf_oxide::PdfDocument;

use crate::data::{Document, DocumentProvider};
use crate::error::AppError;
use crate::models::search::Rect;

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfProvider;

impl DocumentProvider for PdfProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, AppError> {
        let doc = PdfDocument::open(path)
            .map_err(|e| AppError::document(path.display().to_string(), e))?;
        Ok(Box::new(PdfPages { doc }))
    }
}

struct PdfPages {
    doc: PdfDocument,
}

fn pdf_error(e: pdf_oxide::Error) -> AppError {
    AppError::General(format!("pdf: {e}"))
}

impl Document for PdfPages {
    fn page_count(&mut self) -> Result<usize, AppError> {
        self.doc.page_count().map_err(pdf_error)
    }

    fn page_text(&mut self, page_index: usize) -> Result<String, AppError> {
        self.doc.extract_text(page_index).map_err(pdf_error)
    }

    fn find_rects(&mut self, page_index: usize, literal: &str) -> Result<Vec<Rect>, AppError> {
        if literal.is_empty() {
            return Ok(Vec::new());
        }
        let options = SearchOptions::case_insensitive()
            .with_literal(true)
            .with_page_range(page_index, page_index);
        let hits = TextSearcher::search(&mut self.doc, literal, &options).map_err(pdf_error)?;

        Ok(hits
            .into_iter()
            .map(|hit| {
                let b = hit.bbox;
                Rect::new(
                    f64::from(b.x),
                    f64::from(b.y),
                    f64::from(b.x + b.width),
                    f64::from(b.y + b.height),
                )
            })
            .collect())
    }
}
