/// SubTask model and database operations
///
/// Subtasks belong to a task and are swept when their task (or its project,
/// or a referenced user) is deleted. A `member` principal may only toggle
/// `is_completed`; every other field is admin-only, mirroring the task
/// field rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// SubTask model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubTask {
    /// Unique subtask ID
    pub id: Uuid,

    /// Task this subtask belongs to
    pub task_id: Uuid,

    /// Subtask title
    pub title: String,

    /// Optional assignee (None if unassigned or the user was deleted)
    pub assigned_to: Option<Uuid>,

    /// User who created the subtask
    pub created_by: Uuid,

    /// Completion flag
    pub is_completed: bool,

    /// When the subtask was created
    pub created_at: DateTime<Utc>,

    /// When the subtask was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new subtask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubTask {
    /// Task ID
    pub task_id: Uuid,

    /// Title
    pub title: String,

    /// Optional assignee (must be a project member unless the actor is a
    /// super-admin)
    pub assigned_to: Option<Uuid>,

    /// Creating user
    pub created_by: Uuid,
}

/// Field-level changes for a subtask update
///
/// `member` principals may only set `is_completed`; see
/// `auth::access::authorize_subtask_update`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubTaskChanges {
    /// New title (admin-only)
    pub title: Option<String>,

    /// Reassign; `Some(None)` clears the assignee (admin-only)
    pub assigned_to: Option<Option<Uuid>>,

    /// Completion flag (any member)
    pub is_completed: Option<bool>,
}

impl SubTaskChanges {
    /// Whether this update touches any field beyond `is_completed`
    pub fn touches_admin_fields(&self) -> bool {
        self.title.is_some() || self.assigned_to.is_some()
    }
}

impl SubTask {
    /// Creates a new subtask
    pub async fn create(pool: &PgPool, data: CreateSubTask) -> Result<Self, sqlx::Error> {
        let subtask = sqlx::query_as::<_, SubTask>(
            r#"
            INSERT INTO subtasks (task_id, title, assigned_to, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, task_id, title, assigned_to, created_by, is_completed,
                      created_at, updated_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.title)
        .bind(data.assigned_to)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(subtask)
    }

    /// Finds a subtask by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let subtask = sqlx::query_as::<_, SubTask>(
            r#"
            SELECT id, task_id, title, assigned_to, created_by, is_completed,
                   created_at, updated_at
            FROM subtasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(subtask)
    }

    /// Applies a set of field changes to a subtask
    pub async fn apply_changes(
        pool: &PgPool,
        id: Uuid,
        changes: SubTaskChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        // assigned_to distinguishes "leave alone" (outer None) from
        // "clear" (Some(None)), so it cannot go through COALESCE.
        let subtask = sqlx::query_as::<_, SubTask>(
            r#"
            UPDATE subtasks
            SET title = COALESCE($2, title),
                assigned_to = CASE WHEN $3 THEN $4 ELSE assigned_to END,
                is_completed = COALESCE($5, is_completed),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, task_id, title, assigned_to, created_by, is_completed,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.assigned_to.is_some())
        .bind(changes.assigned_to.flatten())
        .bind(changes.is_completed)
        .fetch_optional(pool)
        .await?;

        Ok(subtask)
    }

    /// Lists all subtasks of a task
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let subtasks = sqlx::query_as::<_, SubTask>(
            r#"
            SELECT id, task_id, title, assigned_to, created_by, is_completed,
                   created_at, updated_at
            FROM subtasks
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(subtasks)
    }

    /// Deletes a subtask
    ///
    /// # Returns
    ///
    /// True if a subtask was deleted, false if none existed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_touches_admin_fields() {
        let completion_only = SubTaskChanges {
            is_completed: Some(true),
            ..Default::default()
        };
        assert!(!completion_only.touches_admin_fields());

        let clear_assignee = SubTaskChanges {
            assigned_to: Some(None),
            ..Default::default()
        };
        assert!(clear_assignee.touches_admin_fields());
    }
}
