/// Document model and database operations
///
/// This module provides the Document model for files attached to tasks. The
/// row stores the original file name, the path of the stored file relative
/// to the storage root, and a content fingerprint (SHA-256 hex digest plus
/// byte size) computed once at creation.
///
/// Creation, file replacement, and deletion go through the `documents`
/// module so the stored file and the record stay in sync; the raw CRUD here
/// never touches storage.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE documents (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     file_name VARCHAR(255) NOT NULL,
///     file_path VARCHAR(512) NOT NULL,
///     file_hash VARCHAR(64) NOT NULL,
///     file_size BIGINT NOT NULL DEFAULT 0,
///     uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Document model representing a file attached to a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,

    /// Task this document belongs to
    pub task_id: Uuid,

    /// Original file name as uploaded
    pub file_name: String,

    /// Stored file path, relative to the storage root
    pub file_path: String,

    /// SHA-256 hex digest of the file content
    ///
    /// Computed once at creation; never recomputed, even when the stored
    /// file is replaced
    pub file_hash: String,

    /// File size in bytes
    ///
    /// Computed once at creation alongside the hash
    pub file_size: i64,

    /// When the document was uploaded
    pub uploaded_at: DateTime<Utc>,
}

/// Input for inserting a document record
///
/// Produced by `documents::create_document` after the content has been
/// hashed and written to storage.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    /// Task this document belongs to
    pub task_id: Uuid,

    /// Original file name
    pub file_name: String,

    /// Stored file path, relative to the storage root
    pub file_path: String,

    /// SHA-256 hex digest of the content
    pub file_hash: String,

    /// Content size in bytes
    pub file_size: i64,
}

impl Document {
    /// Inserts a document record
    pub async fn create(pool: &PgPool, data: CreateDocument) -> Result<Self, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (task_id, file_name, file_path, file_hash, file_size)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, task_id, file_name, file_path, file_hash, file_size, uploaded_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.file_name)
        .bind(data.file_path)
        .bind(data.file_hash)
        .bind(data.file_size)
        .fetch_one(pool)
        .await?;

        Ok(document)
    }

    /// Finds a document by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, task_id, file_name, file_path, file_hash, file_size, uploaded_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    /// Finds a document under a task with the given content hash
    ///
    /// Used for duplicate detection before accepting an upload.
    pub async fn find_by_task_and_hash(
        pool: &PgPool,
        task_id: Uuid,
        file_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, task_id, file_name, file_path, file_hash, file_size, uploaded_at
            FROM documents
            WHERE task_id = $1 AND file_hash = $2
            LIMIT 1
            "#,
        )
        .bind(task_id)
        .bind(file_hash)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    /// Lists documents for a task, newest first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, task_id, file_name, file_path, file_hash, file_size, uploaded_at
            FROM documents
            WHERE task_id = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(documents)
    }

    /// Points a document record at a different stored file
    ///
    /// Used by `documents::replace_document_file` after the new content has
    /// been written. Hash and size are deliberately left untouched; they
    /// describe the content fingerprinted at creation.
    pub async fn update_file(
        pool: &PgPool,
        id: Uuid,
        file_name: &str,
        file_path: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET file_name = $2,
                file_path = $3
            WHERE id = $1
            RETURNING id, task_id, file_name, file_path, file_hash, file_size, uploaded_at
            "#,
        )
        .bind(id)
        .bind(file_name)
        .bind(file_path)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    /// Deletes a document record
    ///
    /// The stored file is NOT removed here; use `documents::delete_document`.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts documents for a task
    pub async fn count_by_task(pool: &PgPool, task_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM documents WHERE task_id = $1")
                .bind(task_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_document_struct() {
        let data = CreateDocument {
            task_id: Uuid::new_v4(),
            file_name: "notes.pdf".to_string(),
            file_path: "documents/2025_06_01/20250601_120000_abcd1234_notes.pdf".to_string(),
            file_hash: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
                .to_string(),
            file_size: 0,
        };

        assert_eq!(data.file_name, "notes.pdf");
        assert_eq!(data.file_hash.len(), 64);
    }

    // Integration tests for database operations are in tests/document_tests.rs
}
