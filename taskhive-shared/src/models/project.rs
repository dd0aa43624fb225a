/// Project model and database operations
///
/// A project is the tenancy unit: it owns its memberships, tasks, notes and
/// documents, all of which are swept by the Consistency Coordinator when the
/// project is deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name CITEXT NOT NULL UNIQUE,
///     description TEXT NOT NULL DEFAULT '',
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     completed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Project names are globally unique, case-insensitively, via CITEXT. Both
/// create and rename rely on the column constraint rather than a pre-check,
/// so concurrent create/rename to the same name cannot both succeed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name (case-insensitively unique across all projects)
    pub name: String,

    /// Free-form description
    pub description: String,

    /// User who created the project (None if that user was deleted)
    pub created_by: Option<Uuid>,

    /// Whether the project has been marked complete
    pub is_completed: bool,

    /// When the project was marked complete
    pub completed_at: Option<DateTime<Utc>>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name (must be unique)
    pub name: String,

    /// Description (defaults to empty)
    #[serde(default)]
    pub description: String,

    /// Creating user
    pub created_by: Uuid,
}

/// Input for updating a project
///
/// All fields optional; only non-None fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// Rename the project (uniqueness enforced at the store)
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// Mark complete / not complete; completing stamps `completed_at`
    pub is_completed: Option<bool>,
}

impl Project {
    /// Creates a project together with the creator's `project_admin`
    /// membership, in one transaction
    ///
    /// No project may exist without an admin, so the two inserts commit or
    /// roll back together. A super-admin creator is the exception: they
    /// never hold memberships, so `creator_is_super_admin` skips the
    /// membership insert and the project starts with zero members.
    pub async fn create_with_admin(
        pool: &PgPool,
        data: CreateProject,
        creator_is_super_admin: bool,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let created_by = data.created_by;
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_by, is_completed, completed_at,
                      created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        if !creator_is_super_admin {
            sqlx::query(
                "INSERT INTO memberships (project_id, user_id, role) VALUES ($1, $2, 'project_admin')",
            )
            .bind(project.id)
            .bind(created_by)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_by, is_completed, completed_at,
                   created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Updates a project's mutable fields
    ///
    /// Setting `is_completed = true` stamps `completed_at`; setting it back
    /// to false clears the stamp. A rename that collides with an existing
    /// name fails on the unique constraint.
    ///
    /// # Returns
    ///
    /// The updated project if found, None otherwise
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_completed = COALESCE($4, is_completed),
                completed_at = CASE
                    WHEN $4 IS TRUE AND NOT is_completed THEN NOW()
                    WHEN $4 IS FALSE THEN NULL
                    ELSE completed_at
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_by, is_completed, completed_at,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.is_completed)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects a user is a member of
    pub async fn list_for_member(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.description, p.created_by, p.is_completed,
                   p.completed_at, p.created_at, p.updated_at
            FROM projects p
            JOIN memberships m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Lists every project (super-admin view)
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_by, is_completed, completed_at,
                   created_at, updated_at
            FROM projects
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_default_is_noop() {
        let update = UpdateProject::default();
        assert!(update.name.is_none());
        assert!(update.description.is_none());
        assert!(update.is_completed.is_none());
    }

    #[test]
    fn test_create_project_description_defaults_empty() {
        let data: CreateProject = serde_json::from_str(
            r#"{"name": "Alpha", "created_by": "5f1e0f2e-8d7a-4b9c-9a66-0f6f1b6a4a11"}"#,
        )
        .unwrap();
        assert_eq!(data.description, "");
    }
}
