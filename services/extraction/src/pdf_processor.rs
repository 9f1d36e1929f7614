//! Document text extraction backend.
//!
//! The engine treats text extraction as an opaque capability; this is the
//! implementation behind it. PDFs go through the pdf-extract crate; plain
//! text passes through. Image formats have no text layer (OCR is out of
//! scope) and classify as per-document extraction failures.

use chemextract_utils::{ChemExtractError, ChemExtractResult};

pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from document bytes, routed by file type.
    pub fn extract_text(&self, file_type: &str, data: &[u8]) -> ChemExtractResult<String> {
        match file_type {
            "pdf" => self.extract_pdf(data),
            "txt" => Ok(String::from_utf8_lossy(data).into_owned()),
            other => Err(ChemExtractError::document_processing(format!(
                "no text extraction backend for '{other}' files"
            ))),
        }
    }

    fn extract_pdf(&self, data: &[u8]) -> ChemExtractResult<String> {
        pdf_extract::extract_text_from_mem(data).map_err(|error| {
            ChemExtractError::document_processing(format!(
                "failed to extract text from PDF: {error}"
            ))
        })
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}
