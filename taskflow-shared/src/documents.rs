/// Document upload, replacement, and deletion lifecycle
///
/// This module keeps document records and their stored files in sync:
///
/// - **Create**: the content is fingerprinted (SHA-256 digest + byte size)
///   before anything is written. An upload whose content already exists
///   under the same task is rejected with a validation error naming the
///   conflicting file. The fingerprint is computed exactly once, here, and
///   never recomputed afterwards.
/// - **Delete**: the stored file is removed before the record. Storage
///   failures (missing file, permissions) are swallowed; the record
///   deletion always proceeds.
/// - **Replace**: the new content is stored first, then the previously
///   referenced file is removed (best-effort) and the record is pointed at
///   the new path. Hash and size keep describing the original content.
///
/// Cascading deletes of tasks, projects, and users run through the
/// `deletion` module, which reuses the same best-effort file removal.
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::documents::{create_document, delete_document};
/// use taskflow_shared::storage::LocalStorage;
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, task_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let storage = LocalStorage::new("/var/lib/taskflow/media");
///
/// let doc = create_document(&pool, &storage, task_id, "notes.pdf", b"content").await?;
/// delete_document(&pool, &storage, doc.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::document::{CreateDocument, Document};
use crate::storage::{document_path, FileStorage, StorageError};

/// Document lifecycle error type
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The same content already exists under this task
    #[error("This file has already been uploaded as \"{existing}\".")]
    Duplicate {
        /// File name of the conflicting document
        existing: String,
    },

    /// Document record does not exist
    #[error("Document not found: {0}")]
    NotFound(Uuid),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storage write failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Computes the hex-encoded SHA-256 digest of file content
pub fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Creates a document under a task
///
/// Fingerprints the content, rejects duplicates within the task, writes the
/// content to storage at a generated path, and inserts the record.
///
/// # Errors
///
/// - [`DocumentError::Duplicate`] if a document with identical content
///   already exists under `task_id` (the error names that document's file)
/// - [`DocumentError::Storage`] if the content cannot be written
/// - [`DocumentError::Database`] on record insertion failure
pub async fn create_document(
    pool: &PgPool,
    storage: &dyn FileStorage,
    task_id: Uuid,
    file_name: &str,
    content: &[u8],
) -> Result<Document, DocumentError> {
    let file_hash = content_hash(content);

    if let Some(existing) = Document::find_by_task_and_hash(pool, task_id, &file_hash).await? {
        return Err(DocumentError::Duplicate {
            existing: existing.file_name,
        });
    }

    let file_path = document_path(file_name, Utc::now());
    storage.store(&file_path, content).await?;

    let document = Document::create(
        pool,
        CreateDocument {
            task_id,
            file_name: file_name.to_string(),
            file_path,
            file_hash,
            file_size: content.len() as i64,
        },
    )
    .await?;

    info!(
        document_id = %document.id,
        task_id = %task_id,
        file_name = %document.file_name,
        file_size = document.file_size,
        "Document created"
    );

    Ok(document)
}

/// Deletes a document and its stored file
///
/// The stored file is removed first (best-effort), then the record.
///
/// # Returns
///
/// True if the record existed and was deleted, false otherwise
///
/// # Errors
///
/// Returns [`DocumentError::Database`] on record lookup/deletion failure.
/// Storage failures never surface here.
pub async fn delete_document(
    pool: &PgPool,
    storage: &dyn FileStorage,
    id: Uuid,
) -> Result<bool, DocumentError> {
    let document = match Document::find_by_id(pool, id).await? {
        Some(document) => document,
        None => return Ok(false),
    };

    remove_stored_file(storage, &document.file_path).await;

    let deleted = Document::delete(pool, id).await?;

    if deleted {
        info!(document_id = %id, file_name = %document.file_name, "Document deleted");
    }

    Ok(deleted)
}

/// Replaces the stored file behind a document
///
/// Writes the new content at a fresh path, removes the old file
/// (best-effort), and updates the record's file name and path. The
/// document's hash and size are left as computed at creation.
///
/// # Errors
///
/// - [`DocumentError::NotFound`] if the document does not exist
/// - [`DocumentError::Storage`] if the new content cannot be written (the
///   old file is untouched in that case)
pub async fn replace_document_file(
    pool: &PgPool,
    storage: &dyn FileStorage,
    id: Uuid,
    file_name: &str,
    content: &[u8],
) -> Result<Document, DocumentError> {
    let existing = Document::find_by_id(pool, id)
        .await?
        .ok_or(DocumentError::NotFound(id))?;

    let new_path = document_path(file_name, Utc::now());
    storage.store(&new_path, content).await?;

    remove_stored_file(storage, &existing.file_path).await;

    let updated = Document::update_file(pool, id, file_name, &new_path)
        .await?
        .ok_or(DocumentError::NotFound(id))?;

    info!(
        document_id = %id,
        old_path = %existing.file_path,
        new_path = %updated.file_path,
        "Document file replaced"
    );

    Ok(updated)
}

/// Removes a stored file, ignoring any failure
///
/// Cleanup must never block or fail the record operation it accompanies.
pub(crate) async fn remove_stored_file(storage: &dyn FileStorage, path: &str) {
    if let Err(e) = storage.delete(path).await {
        debug!(path = %path, error = %e, "Ignoring stored-file cleanup failure");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;

    #[test]
    fn test_content_hash_known_vectors() {
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            content_hash(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = content_hash(b"same bytes");
        let b = content_hash(b"same bytes");
        assert_eq!(a, b);

        let c = content_hash(b"different bytes");
        assert_ne!(a, c);
    }

    #[test]
    fn test_duplicate_error_names_existing_file() {
        let err = DocumentError::Duplicate {
            existing: "report.pdf".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "This file has already been uploaded as \"report.pdf\"."
        );
    }

    #[tokio::test]
    async fn test_remove_stored_file_swallows_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        // Missing file: must not panic or propagate
        remove_stored_file(&storage, "documents/never_existed.txt").await;
    }

    // Database-backed lifecycle tests are in tests/document_tests.rs
}
