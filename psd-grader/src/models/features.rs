//! Feature set derived from one document's extracted text

use crate::extractors::{ExtractedText, ExtractionError};

/// Inputs to the difficulty heuristic
///
/// Created fresh per document and never persisted. `page_count` is always
/// at least 1: a document without pages is an extraction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    page_count: u32,
    extracted_text: String,
    text_length: usize,
}

impl FeatureSet {
    pub fn new(page_count: u32, extracted_text: impl Into<String>) -> Result<Self, ExtractionError> {
        if page_count == 0 {
            return Err(ExtractionError::EmptyDocument);
        }

        let extracted_text = extracted_text.into();
        let text_length = extracted_text.chars().count();

        Ok(Self {
            page_count,
            extracted_text,
            text_length,
        })
    }

    /// Build from extractor output, joining page texts without a separator
    pub fn from_extracted(extracted: ExtractedText) -> Result<Self, ExtractionError> {
        let page_count = u32::try_from(extracted.page_count())
            .map_err(|_| ExtractionError::Pdf("page count out of range".to_string()))?;
        Self::new(page_count, extracted.page_texts.concat())
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn extracted_text(&self) -> &str {
        &self.extracted_text
    }

    /// Length in characters (Unicode scalar values), not bytes
    pub fn text_length(&self) -> usize {
        self.text_length
    }
}
