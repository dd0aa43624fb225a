/// Note model and database operations
///
/// Notes are free-form text attached to a project. Any project member may
/// create one; deletion is restricted to the creator, a project_admin, or a
/// super-admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Note model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    /// Unique note ID
    pub id: Uuid,

    /// Project this note belongs to
    pub project_id: Uuid,

    /// Note content
    pub content: String,

    /// User who created the note
    pub created_by: Uuid,

    /// When the note was created
    pub created_at: DateTime<Utc>,

    /// When the note was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    /// Project ID
    pub project_id: Uuid,

    /// Content
    pub content: String,

    /// Creating user
    pub created_by: Uuid,
}

impl Note {
    /// Creates a new note
    pub async fn create(pool: &PgPool, data: CreateNote) -> Result<Self, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (project_id, content, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, content, created_by, created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.content)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(note)
    }

    /// Finds a note by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, project_id, content, created_by, created_at, updated_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(note)
    }

    /// Lists all notes in a project
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, project_id, content, created_by, created_at, updated_at
            FROM notes
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(notes)
    }

    /// Deletes a note
    ///
    /// # Returns
    ///
    /// True if a note was deleted, false if none existed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
