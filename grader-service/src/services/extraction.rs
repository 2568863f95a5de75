//! PDF text extraction.
//!
//! Extraction is three stages, each usable on its own:
//!
//! 1. [`page_texts`]: PDF bytes to one string per page, in page order;
//! 2. [`join_pages`]: pages joined with `\n`, surrounding whitespace trimmed;
//! 3. [`require_text`]: rejects an empty result.
//!
//! [`extract_text`] runs all three.

use lopdf::Document;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The bytes are not a PDF lopdf can load.
    #[error("Could not read the PDF file: {0}")]
    Unreadable(String),

    /// The PDF loaded but yielded no text (scanned or image-only documents).
    #[error("Could not extract text from the PDF file")]
    NoText,
}

/// Non-empty, trimmed text pulled from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
}

impl ExtractedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Stage 1: loads the document and extracts each page's text.
///
/// A page whose content lopdf cannot decode contributes an empty string
/// rather than failing the whole document.
pub fn page_texts(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    let pages = doc.get_pages();
    let mut texts = Vec::with_capacity(pages.len());

    for page_number in pages.keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => texts.push(text),
            Err(e) => {
                tracing::warn!(page = page_number, error = %e, "Failed to extract page text");
                texts.push(String::new());
            }
        }
    }

    Ok(texts)
}

/// Stage 2: newline-joins page texts and trims the result.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Stage 3: accepts only non-empty text.
pub fn require_text(joined: String) -> Result<ExtractedText, ExtractionError> {
    if joined.is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(ExtractedText { text: joined })
}

/// Full pipeline from uploaded bytes to usable text.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let pages = page_texts(bytes)?;
    tracing::debug!(page_count = pages.len(), "Extracted PDF pages");
    require_text(join_pages(&pages))
}
