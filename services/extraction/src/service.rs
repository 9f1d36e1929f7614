//! Extraction service.
//!
//! Wires the document store, the text-extraction backend, the engine, and
//! the report renderer into the batch-processing flow behind the HTTP
//! routes.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

use chemextract_engine::{labeled_rows, presentation_rows, BatchDocument, BatchOrchestrator, Classifier};
use chemextract_models::{CategoryCatalog, ClassificationRow, DocumentRecord};
use chemextract_utils::{AppConfig, ChemExtractError, ChemExtractResult, StorageConfig};

use crate::pdf_processor::PdfProcessor;
use crate::report;
use crate::store::{DocumentStore, StoredDocument};

/// Per-document failure annotation surfaced alongside the rows.
#[derive(Debug, Clone, Serialize)]
pub struct FailureNote {
    pub document: String,
    pub reason: String,
}

/// Everything one processing run produces.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub rows: Vec<ClassificationRow>,
    pub records: Vec<DocumentRecord>,
    pub failures: Vec<FailureNote>,
    pub report_filename: String,
    pub total_documents: usize,
}

impl ProcessOutcome {
    pub fn total_cas(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Clone)]
pub struct ExtractionService {
    store: DocumentStore,
    classifier: Classifier,
    orchestrator: Arc<BatchOrchestrator>,
    processor: Arc<PdfProcessor>,
    storage: StorageConfig,
}

impl ExtractionService {
    pub fn new(config: &AppConfig, catalog: CategoryCatalog) -> Self {
        Self {
            store: DocumentStore::new(),
            classifier: Classifier::new(Arc::new(catalog)),
            orchestrator: Arc::new(
                BatchOrchestrator::new().with_worker_cap(config.processing.worker_cap),
            ),
            processor: Arc::new(PdfProcessor::new()),
            storage: config.storage.clone(),
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        self.classifier.catalog()
    }

    pub fn results_dir(&self) -> &str {
        &self.storage.results_dir
    }

    /// Validate and store one upload batch.
    pub async fn store_uploads(
        &self,
        files: Vec<(String, Vec<u8>)>,
    ) -> ChemExtractResult<Vec<StoredDocument>> {
        if files.is_empty() {
            return Err(ChemExtractError::validation("files", "no files provided"));
        }

        if files.len() > self.storage.max_files_per_batch {
            return Err(ChemExtractError::validation(
                "files",
                format!("at most {} files per batch", self.storage.max_files_per_batch),
            ));
        }

        for (name, _) in &files {
            let extension = crate::store::file_extension(name);
            if !self.storage.allowed_extensions.contains(&extension) {
                return Err(ChemExtractError::validation(
                    "files",
                    format!("file type not allowed: {name}"),
                ));
            }
        }

        let mut stored = Vec::with_capacity(files.len());
        for (name, data) in files {
            stored.push(self.store.insert(&name, data).await);
        }

        tracing::info!(count = stored.len(), "stored upload batch");
        Ok(stored)
    }

    /// Run the full pipeline over the requested documents.
    ///
    /// With an explicit id list, processing order is the list order;
    /// otherwise every stored document is processed in upload order.
    pub async fn process(
        &self,
        document_ids: Option<Vec<Uuid>>,
    ) -> ChemExtractResult<ProcessOutcome> {
        let documents = match document_ids {
            Some(ids) if !ids.is_empty() => self.store.get_many(&ids).await?,
            _ => self.store.all_in_upload_order().await,
        };

        if documents.is_empty() {
            return Err(ChemExtractError::nothing_to_report("no documents to process"));
        }

        let total_documents = documents.len();

        // Phase 1: parallel extraction + per-document aggregation.
        let phase_start = Instant::now();
        let batch: Vec<BatchDocument<(String, Vec<u8>)>> = documents
            .into_iter()
            .map(|d| BatchDocument::new(d.original_name, (d.file_type, d.data)))
            .collect();

        let processor = Arc::clone(&self.processor);
        let records = self
            .orchestrator
            .process(batch, move |(file_type, data): (String, Vec<u8>)| {
                processor.extract_text(&file_type, &data)
            })
            .await;
        tracing::info!(
            elapsed_ms = phase_start.elapsed().as_millis() as u64,
            documents = records.len(),
            "extraction phase complete"
        );

        // Phase 2: classification over the ordered records.
        let phase_start = Instant::now();
        let labeled = labeled_rows(&records, &self.classifier);
        let rows = presentation_rows(&labeled);
        tracing::info!(
            elapsed_ms = phase_start.elapsed().as_millis() as u64,
            rows = rows.len(),
            "classification phase complete"
        );

        let failures: Vec<FailureNote> = records
            .iter()
            .filter_map(|record| {
                record.failure.as_ref().map(|reason| FailureNote {
                    document: record.display_name.clone(),
                    reason: reason.clone(),
                })
            })
            .collect();

        if rows.is_empty() {
            let message = if failures.is_empty() {
                "no CAS numbers found in the batch".to_string()
            } else {
                format!(
                    "no CAS numbers found ({} of {} documents failed extraction)",
                    failures.len(),
                    total_documents
                )
            };
            return Err(ChemExtractError::nothing_to_report(message));
        }

        // Phase 3: report rendering.
        let phase_start = Instant::now();
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let report_filename = report::write_report(
            &rows,
            self.classifier.catalog(),
            Path::new(&self.storage.results_dir),
            &timestamp,
        )?;
        tracing::info!(
            elapsed_ms = phase_start.elapsed().as_millis() as u64,
            file = %report_filename,
            "report rendering complete"
        );

        Ok(ProcessOutcome {
            rows,
            records,
            failures,
            report_filename,
            total_documents,
        })
    }
}
