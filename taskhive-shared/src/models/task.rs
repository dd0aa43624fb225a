/// Task model and database operations
///
/// Tasks belong to a project and are always assigned to a project member
/// (the Consistency Coordinator enforces assignee eligibility; a super-admin
/// actor may override it). Deleting a task sweeps its subtasks first.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     assigned_to UUID NOT NULL REFERENCES users(id),
///     assigned_by UUID NOT NULL REFERENCES users(id),
///     status task_status NOT NULL DEFAULT 'todo',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::task::{CreateTask, Task, TaskStatus};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid, alice: Uuid, bob: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     project_id,
///     title: "Write onboarding doc".to_string(),
///     description: String::new(),
///     assigned_to: bob,
///     assigned_by: alice,
/// }).await?;
///
/// assert_eq!(task.status, TaskStatus::Todo);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Project this task belongs to
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// User the task is assigned to (must be a project member)
    pub assigned_to: Uuid,

    /// User who made the assignment
    pub assigned_by: Uuid,

    /// Current workflow status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Project ID
    pub project_id: Uuid,

    /// Title
    pub title: String,

    /// Description (defaults to empty)
    #[serde(default)]
    pub description: String,

    /// Assignee (must be a project member unless the actor is a super-admin)
    pub assigned_to: Uuid,

    /// Assigner
    pub assigned_by: Uuid,
}

/// Field-level changes for a task update
///
/// The Access Evaluator restricts `member`-role principals to `status`;
/// `title`, `description` and `assigned_to` are admin-only fields. See
/// `auth::access::authorize_task_update`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskChanges {
    /// New title (admin-only)
    pub title: Option<String>,

    /// New description (admin-only)
    pub description: Option<String>,

    /// Reassign the task (admin-only; assignee eligibility re-checked)
    pub assigned_to: Option<Uuid>,

    /// New workflow status (any member)
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    /// Whether this update touches any field beyond `status`
    pub fn touches_admin_fields(&self) -> bool {
        self.title.is_some() || self.description.is_some() || self.assigned_to.is_some()
    }
}

impl Task {
    /// Creates a new task in `todo` status
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, assigned_to, assigned_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, title, description, assigned_to, assigned_by,
                      status, created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.assigned_to)
        .bind(data.assigned_by)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, assigned_to, assigned_by,
                   status, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies a set of field changes to a task
    ///
    /// Authorization (which fields this principal may touch) happens before
    /// this call; this method writes whatever it is given.
    ///
    /// # Returns
    ///
    /// The updated task if found, None otherwise
    pub async fn apply_changes(
        pool: &PgPool,
        id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                assigned_to = COALESCE($4, assigned_to),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, project_id, title, description, assigned_to, assigned_by,
                      status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.assigned_to)
        .bind(changes.status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks in a project
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, assigned_to, assigned_by,
                   status, created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_changes_touches_admin_fields() {
        let status_only = TaskChanges {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        assert!(!status_only.touches_admin_fields());

        let retitle = TaskChanges {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(retitle.touches_admin_fields());

        let reassign = TaskChanges {
            assigned_to: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(reassign.touches_admin_fields());
    }
}
