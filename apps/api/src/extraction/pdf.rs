//! PDF text extraction and a rough quality estimate of the extracted text.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from PDF: {0}")]
    Extraction(String),

    #[error("PDF contains no extractable text")]
    Empty,
}

/// Reads the PDF at `path` and returns its text. Blocking; call from
/// `spawn_blocking` inside async handlers.
pub fn extract_text(path: &Path) -> Result<String, PdfError> {
    let bytes = std::fs::read(path).map_err(|source| PdfError::Io {
        path: path.display().to_string(),
        source,
    })?;
    extract_text_from_bytes(&bytes)
}

pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String, PdfError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Extraction(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(PdfError::Empty);
    }

    debug!(bytes = bytes.len(), chars = text.len(), "Extracted PDF text");
    Ok(text)
}

/// Heuristic quality of extracted text, both values in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DocumentQuality {
    /// Share of whitespace-separated words that are alphanumeric and longer
    /// than one character.
    pub scan_accuracy: f64,
    /// Mean of: mentions a section header, has more than five lines, has more
    /// than 100 words.
    pub confidence_score: f64,
}

impl DocumentQuality {
    pub fn assess(text: &str) -> Self {
        if text.is_empty() {
            return Self {
                scan_accuracy: 0.0,
                confidence_score: 0.0,
            };
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        let recognizable = words
            .iter()
            .filter(|w| w.chars().count() > 1 && w.chars().all(char::is_alphanumeric))
            .count();
        let scan_accuracy = if words.is_empty() {
            0.0
        } else {
            (recognizable as f64 / words.len() as f64).min(1.0)
        };

        let lower = text.to_lowercase();
        let has_sections = ["experience", "education", "skills"]
            .iter()
            .any(|header| lower.contains(header));
        let has_formatting = text.contains('\n') && text.split('\n').count() > 5;
        let has_content = words.len() > 100;
        let confidence_score =
            [has_sections, has_formatting, has_content].iter().filter(|b| **b).count() as f64 / 3.0;

        Self {
            scan_accuracy,
            confidence_score,
        }
    }
}
