//! Extraction result models.
//!
//! Types produced by scanning one document's text for CAS numbers.

use serde::{Deserialize, Serialize};

/// A distinct CAS number occurrence tagged with its checksum validity,
/// positioned by first appearance in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasOccurrence {
    pub cas_number: String,
    pub is_valid: bool,
}

/// The deduplicated, order-preserving outcome of scanning one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Distinct checksum-valid CAS numbers, first-occurrence order.
    pub valid: Vec<String>,
    /// Distinct candidates that failed checksum validation, first-occurrence order.
    pub invalid: Vec<String>,
    /// All distinct candidates tagged with validity, first-occurrence order
    /// across the combined stream.
    pub all_ordered: Vec<CasOccurrence>,
}

impl ExtractionSummary {
    pub fn is_empty(&self) -> bool {
        self.all_ordered.is_empty()
    }

    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }
}

/// One input document's aggregated result.
///
/// Created once per document and never mutated afterward. A document whose
/// text could not be extracted carries the failure reason and an empty
/// summary instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Display name with its final extension segment removed.
    pub product_name: String,
    /// The name the document was submitted under.
    pub display_name: String,
    pub summary: ExtractionSummary,
    pub failure: Option<String>,
}

impl DocumentRecord {
    pub fn extracted(display_name: String, product_name: String, summary: ExtractionSummary) -> Self {
        Self {
            product_name,
            display_name,
            summary,
            failure: None,
        }
    }

    pub fn failed(display_name: String, product_name: String, reason: String) -> Self {
        Self {
            product_name,
            display_name,
            summary: ExtractionSummary::default(),
            failure: Some(reason),
        }
    }

    pub fn has_failure(&self) -> bool {
        self.failure.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_record_is_empty() {
        let record = DocumentRecord::failed(
            "scan.pdf".to_string(),
            "scan".to_string(),
            "unreadable".to_string(),
        );
        assert!(record.has_failure());
        assert!(record.summary.is_empty());
        assert_eq!(record.summary.valid_count(), 0);
    }
}
