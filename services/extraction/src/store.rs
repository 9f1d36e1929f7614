//! In-memory document store.
//!
//! Uploaded documents are held until processed or cleaned up. Stored names
//! are sanitized and timestamp-prefixed; the upload sequence is the default
//! processing order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use chemextract_utils::{ChemExtractError, ChemExtractResult};

/// Stored document
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: Uuid,
    pub stored_name: String,
    pub original_name: String,
    pub file_type: String,
    pub upload_date: String,
    pub sequence: u64,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct DocumentStore {
    documents: Arc<RwLock<HashMap<Uuid, StoredDocument>>>,
    next_sequence: Arc<AtomicU64>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            next_sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Store an uploaded document and return its record.
    pub async fn insert(&self, original_name: &str, data: Vec<u8>) -> StoredDocument {
        let id = Uuid::new_v4();
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");

        let document = StoredDocument {
            id,
            stored_name: format!("{}_{}", timestamp, sanitize_filename(original_name)),
            original_name: original_name.to_string(),
            file_type: file_extension(original_name),
            upload_date: chrono::Utc::now().to_rfc3339(),
            sequence,
            data,
        };

        let mut documents = self.documents.write().await;
        documents.insert(id, document.clone());
        document
    }

    pub async fn get(&self, id: Uuid) -> Option<StoredDocument> {
        let documents = self.documents.read().await;
        documents.get(&id).cloned()
    }

    /// Fetch documents in the order the ids were given.
    pub async fn get_many(&self, ids: &[Uuid]) -> ChemExtractResult<Vec<StoredDocument>> {
        let documents = self.documents.read().await;
        ids.iter()
            .map(|id| {
                documents
                    .get(id)
                    .cloned()
                    .ok_or_else(|| ChemExtractError::not_found(format!("document {id}")))
            })
            .collect()
    }

    /// All stored documents, ordered by upload sequence.
    pub async fn all_in_upload_order(&self) -> Vec<StoredDocument> {
        let documents = self.documents.read().await;
        let mut all: Vec<StoredDocument> = documents.values().cloned().collect();
        all.sort_by_key(|d| d.sequence);
        all
    }

    /// Remove every stored document, returning how many were dropped.
    pub async fn clear(&self) -> usize {
        let mut documents = self.documents.write().await;
        let removed = documents.len();
        documents.clear();
        removed
    }

    pub async fn len(&self) -> usize {
        let documents = self.documents.read().await;
        documents.len()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip path components and characters outside [A-Za-z0-9._-], mapping
/// whitespace to underscores. An unusable name becomes "document".
pub fn sanitize_filename(name: &str) -> String {
    let basename = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(name);

    let cleaned: String = basename
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lowercased final extension segment, empty when the name has none.
pub fn file_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, extension)) => extension.to_ascii_lowercase(),
        None => String::new(),
    }
}
