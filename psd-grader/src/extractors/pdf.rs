//! PDF text extraction via lopdf

use super::{ExtractedText, ExtractionError, TextExtractor};
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// Extracts the text layer of every page of a PDF
///
/// Scanned sheets without a text layer yield empty page texts, which grade
/// as short content rather than failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = Document::load_mem(&bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        let mut page_texts = Vec::with_capacity(pages.len());
        for &page in pages.keys() {
            let text = doc
                .extract_text(&[page])
                .map_err(|e| ExtractionError::Page {
                    page,
                    message: e.to_string(),
                })?;
            page_texts.push(text);
        }

        debug!(
            path = %path.display(),
            pages = page_texts.len(),
            chars = page_texts.iter().map(|t| t.chars().count()).sum::<usize>(),
            "Extracted PDF text"
        );

        Ok(ExtractedText { page_texts })
    }
}
