//! Batch orchestration: bounded-parallel scatter, index-tagged gather.
//!
//! Workers share no mutable state; the only suspension points are the
//! text-extraction call and the pool join. Output order is input order,
//! restored explicitly after the concurrent phase.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use chemextract_models::{ClassificationRow, DocumentRecord, LabeledRow};
use chemextract_utils::ChemExtractError;

use crate::aggregate::aggregate_document;
use crate::classify::Classifier;
use crate::scan::CasScanner;

/// Worker ceiling; the effective pool size is min(cap, batch size).
pub const DEFAULT_WORKER_CAP: usize = 4;

/// One unit of batch input: a display name plus whatever payload the
/// extraction collaborator understands. The engine never decodes payloads.
pub struct BatchDocument<D> {
    pub display_name: String,
    pub payload: D,
}

impl<D> BatchDocument<D> {
    pub fn new(display_name: impl Into<String>, payload: D) -> Self {
        Self {
            display_name: display_name.into(),
            payload,
        }
    }
}

/// Fans documents across a bounded worker pool and reassembles records in
/// submission order.
pub struct BatchOrchestrator {
    scanner: Arc<CasScanner>,
    worker_cap: usize,
}

impl BatchOrchestrator {
    pub fn new() -> Self {
        Self {
            scanner: Arc::new(CasScanner::new()),
            worker_cap: DEFAULT_WORKER_CAP,
        }
    }

    pub fn with_worker_cap(mut self, worker_cap: usize) -> Self {
        self.worker_cap = worker_cap.max(1);
        self
    }

    /// Runs extraction + aggregation for every document.
    ///
    /// There is no cancellation: each document runs to completion or to a
    /// captured per-document failure, and one document's failure never
    /// blocks its siblings.
    pub async fn process<D, E>(
        &self,
        documents: Vec<BatchDocument<D>>,
        extract: E,
    ) -> Vec<DocumentRecord>
    where
        D: Send + 'static,
        E: Fn(D) -> Result<String, ChemExtractError> + Send + Sync + 'static,
    {
        if documents.is_empty() {
            return Vec::new();
        }

        let pool_size = self.worker_cap.min(documents.len());
        let semaphore = Arc::new(Semaphore::new(pool_size));
        let extract = Arc::new(extract);
        let mut workers = JoinSet::new();

        for (index, document) in documents.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let extract = Arc::clone(&extract);
            let scanner = Arc::clone(&self.scanner);

            workers.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("worker semaphore closed");

                let BatchDocument {
                    display_name,
                    payload,
                } = document;

                // Extraction is CPU- or I/O-bound depending on backend; keep
                // it off the async workers.
                let outcome = match tokio::task::spawn_blocking(move || (*extract)(payload)).await {
                    Ok(result) => result,
                    Err(join_error) => Err(ChemExtractError::document_processing(format!(
                        "extraction worker failed: {join_error}"
                    ))),
                };

                (index, aggregate_document(&scanner, &display_name, outcome))
            });
        }

        let mut tagged: Vec<(usize, DocumentRecord)> = Vec::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(pair) => tagged.push(pair),
                Err(join_error) => {
                    tracing::error!(error = %join_error, "batch worker panicked");
                }
            }
        }

        // Completion order is scheduling-dependent; the contract is input
        // order, keyed by the index tag captured at dispatch.
        tagged.sort_by_key(|(index, _)| *index);
        tagged.into_iter().map(|(_, record)| record).collect()
    }
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Flattens records into fully-labeled rows: one row per distinct valid
/// identifier, document order then first-occurrence order within the
/// document. Failed documents contribute zero rows.
pub fn labeled_rows(records: &[DocumentRecord], classifier: &Classifier) -> Vec<LabeledRow> {
    let mut rows = Vec::new();

    for (document_index, record) in records.iter().enumerate() {
        for cas_number in &record.summary.valid {
            rows.push(LabeledRow {
                document_index,
                product_name: record.product_name.clone(),
                cas_number: cas_number.clone(),
                memberships: classifier.classify(cas_number),
            });
        }
    }

    rows
}

/// Applies the legacy spreadsheet labeling over the fully-labeled row set:
/// the product name survives only on the first row of each document.
pub fn presentation_rows(labeled: &[LabeledRow]) -> Vec<ClassificationRow> {
    let mut rows = Vec::with_capacity(labeled.len());
    let mut previous_document: Option<usize> = None;

    for row in labeled {
        let first_of_document = previous_document != Some(row.document_index);
        previous_document = Some(row.document_index);

        rows.push(ClassificationRow {
            product_name: if first_of_document {
                row.product_name.clone()
            } else {
                String::new()
            },
            cas_number: row.cas_number.clone(),
            memberships: row.memberships.clone(),
        });
    }

    rows
}
