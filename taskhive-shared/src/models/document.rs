/// Document model and database operations
///
/// Documents record metadata about files whose bytes live in the external
/// blob store; `file_ref` is the opaque handle the `BlobStore` collaborator
/// understands. Deleting a document (directly or via the project cascade)
/// also releases that blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Document model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,

    /// Project this document belongs to
    pub project_id: Uuid,

    /// User who uploaded the document (None if that user was deleted)
    pub uploaded_by: Option<Uuid>,

    /// Display name
    pub name: String,

    /// Opaque blob handle understood by the BlobStore
    pub file_ref: String,

    /// Public URL of the stored bytes
    pub file_url: String,

    /// File type label (e.g. "pdf", "image")
    pub file_type: String,

    /// Size in bytes
    pub file_size: i64,

    /// MIME type as uploaded
    pub mime_type: String,

    /// When the document was uploaded
    pub created_at: DateTime<Utc>,
}

/// Input for recording a new document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// Project ID
    pub project_id: Uuid,

    /// Uploading user
    pub uploaded_by: Uuid,

    /// Display name
    pub name: String,

    /// Blob handle returned by `BlobStore::put`
    pub file_ref: String,

    /// URL returned by `BlobStore::put`
    pub file_url: String,

    /// File type label
    pub file_type: String,

    /// Size in bytes
    pub file_size: i64,

    /// MIME type
    pub mime_type: String,
}

impl Document {
    /// Records a new document (bytes must already be in the blob store)
    pub async fn create(pool: &PgPool, data: CreateDocument) -> Result<Self, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (project_id, uploaded_by, name, file_ref, file_url,
                                   file_type, file_size, mime_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, project_id, uploaded_by, name, file_ref, file_url,
                      file_type, file_size, mime_type, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.uploaded_by)
        .bind(data.name)
        .bind(data.file_ref)
        .bind(data.file_url)
        .bind(data.file_type)
        .bind(data.file_size)
        .bind(data.mime_type)
        .fetch_one(pool)
        .await?;

        Ok(document)
    }

    /// Finds a document by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, project_id, uploaded_by, name, file_ref, file_url,
                   file_type, file_size, mime_type, created_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    /// Lists all documents in a project
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, project_id, uploaded_by, name, file_ref, file_url,
                   file_type, file_size, mime_type, created_at
            FROM documents
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(documents)
    }

    /// Deletes a document row (blob release is the caller's responsibility)
    ///
    /// # Returns
    ///
    /// True if a document was deleted, false if none existed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
