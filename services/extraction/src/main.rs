//! ChemExtract Extraction Service
//!
//! HTTP surface over the CAS extraction engine: document upload, batch
//! processing, report download, and store cleanup.

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

mod catalog;
mod pdf_processor;
mod report;
mod service;
mod store;

use chemextract_models::ClassificationRow;
use chemextract_utils::{init_logging, AppConfig, ChemExtractError, ErrorResponse};
use service::{ExtractionService, FailureNote};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("falling back to default configuration: {error}");
            AppConfig::default()
        }
    };

    init_logging(&config.logging)?;
    info!("Starting ChemExtract Extraction Service");

    let catalog = catalog::load_catalog(&config.catalog.database_path);
    let service = ExtractionService::new(&config, catalog);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/documents/upload", post(upload_documents))
        .route("/api/v1/batches/process", post(process_batch))
        .route("/api/v1/results/:filename", get(download_report))
        .route("/api/v1/documents", delete(cleanup_documents))
        .layer(DefaultBodyLimit::max(config.server.max_request_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Extraction Service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "extraction",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn error_response(error: ChemExtractError) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::from_u16(error.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(error)))
}

/// Document upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub document_id: Uuid,
    pub stored_name: String,
    pub original_name: String,
    pub file_type: String,
    pub size_bytes: usize,
}

/// Upload one or more documents for screening
async fn upload_documents(
    State(service): State<ExtractionService>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_response(ChemExtractError::validation(
            "multipart",
            format!("upload error: {e}"),
        ))
    })? {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let data = field.bytes().await.map_err(|e| {
            error_response(ChemExtractError::validation(
                "multipart",
                format!("read error: {e}"),
            ))
        })?;

        files.push((filename, data.to_vec()));
    }

    let stored = service.store_uploads(files).await.map_err(error_response)?;

    Ok(Json(UploadResponse {
        message: format!("uploaded {} files", stored.len()),
        files: stored
            .into_iter()
            .map(|d| UploadedFile {
                document_id: d.id,
                stored_name: d.stored_name,
                original_name: d.original_name,
                file_type: d.file_type,
                size_bytes: d.data.len(),
            })
            .collect(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcessRequest {
    /// Processing order when present; upload order otherwise.
    pub document_ids: Option<Vec<Uuid>>,
}

/// Batch processing response
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub message: String,
    pub total_cas: usize,
    pub total_documents: usize,
    pub report_file: String,
    pub headers: Vec<String>,
    pub rows: Vec<ClassificationRow>,
    pub documents: Vec<DocumentSummary>,
    pub failures: Vec<FailureNote>,
}

/// Per-document extraction summary, including identifiers that failed the
/// checksum.
#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub display_name: String,
    pub product_name: String,
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
    pub failure: Option<String>,
}

/// Process stored documents into classification rows and a CSV report
async fn process_batch(
    State(service): State<ExtractionService>,
    request: Option<Json<ProcessRequest>>,
) -> Result<Json<ProcessResponse>, (StatusCode, Json<ErrorResponse>)> {
    let document_ids = request.and_then(|Json(r)| r.document_ids);

    let outcome = service.process(document_ids).await.map_err(error_response)?;

    let documents = outcome
        .records
        .iter()
        .map(|record| DocumentSummary {
            display_name: record.display_name.clone(),
            product_name: record.product_name.clone(),
            valid: record.summary.valid.clone(),
            invalid: record.summary.invalid.clone(),
            failure: record.failure.clone(),
        })
        .collect();

    Ok(Json(ProcessResponse {
        message: format!(
            "extracted {} CAS numbers from {} documents",
            outcome.total_cas(),
            outcome.total_documents
        ),
        total_cas: outcome.total_cas(),
        total_documents: outcome.total_documents,
        report_file: outcome.report_filename.clone(),
        headers: report::report_headers(service.catalog()),
        rows: outcome.rows,
        documents,
        failures: outcome.failures,
    }))
}

/// Download a previously rendered CSV report
async fn download_report(
    State(service): State<ExtractionService>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(error_response(ChemExtractError::validation(
            "filename",
            "invalid report name",
        )));
    }

    let path = std::path::Path::new(service.results_dir()).join(&filename);
    let data = tokio::fs::read(&path)
        .await
        .map_err(|_| error_response(ChemExtractError::not_found(format!("report {filename}"))))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        data,
    ))
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub message: String,
    pub removed: usize,
}

/// Drop every stored document
async fn cleanup_documents(State(service): State<ExtractionService>) -> Json<CleanupResponse> {
    let removed = service.store().clear().await;
    info!(removed, "document store cleared");

    Json(CleanupResponse {
        message: "cleanup complete".to_string(),
        removed,
    })
}
