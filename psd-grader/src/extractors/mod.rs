//! Text extraction providers
//!
//! The scorer never reads documents itself. A [`TextExtractor`] turns a
//! document path into per-page text; anything that goes wrong on the way
//! is an [`ExtractionError`], which the batch layer turns into a degraded
//! report instead of aborting the scan.

pub mod pdf;

pub use pdf::PdfTextExtractor;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Text extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Document could not be read from disk
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not a parseable PDF
    #[error("invalid PDF: {0}")]
    Pdf(String),

    /// Document parsed but has no pages
    #[error("document has no pages")]
    EmptyDocument,

    /// Text of one page could not be decoded
    #[error("page {page}: {message}")]
    Page { page: u32, message: String },
}

/// Per-page text of one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// Page texts in page order
    pub page_texts: Vec<String>,
}

impl ExtractedText {
    pub fn page_count(&self) -> usize {
        self.page_texts.len()
    }
}

/// Produces extractable page texts for a document
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError>;
}
