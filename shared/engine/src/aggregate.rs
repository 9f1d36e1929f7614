//! Per-document aggregation.
//!
//! Binds one document's extraction outcome to its product name. Extraction
//! failures are captured on the record and never abort the batch.

use chemextract_models::DocumentRecord;
use chemextract_utils::ChemExtractError;

use crate::scan::CasScanner;

/// Display name with its final extension segment removed.
///
/// Stripping may yield the empty string (a name like ".pdf"); that is a
/// valid product name, not an error.
pub fn product_name(display_name: &str) -> String {
    match display_name.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => display_name.to_string(),
    }
}

/// Produces exactly one record for one document.
pub fn aggregate_document(
    scanner: &CasScanner,
    display_name: &str,
    extraction: Result<String, ChemExtractError>,
) -> DocumentRecord {
    let product = product_name(display_name);

    match extraction {
        Ok(text) => {
            let summary = scanner.scan(&text);
            tracing::info!(
                document = display_name,
                valid = summary.valid.len(),
                invalid = summary.invalid.len(),
                "scanned document"
            );
            DocumentRecord::extracted(display_name.to_string(), product, summary)
        }
        Err(error) => {
            tracing::warn!(document = display_name, error = %error, "text extraction failed");
            DocumentRecord::failed(display_name.to_string(), product, error.to_string())
        }
    }
}
