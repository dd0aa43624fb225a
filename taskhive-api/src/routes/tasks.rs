/// Task endpoints
///
/// # Endpoints
///
/// - `POST /v1/projects/:id/tasks` - Create a task (admin)
/// - `GET /v1/projects/:id/tasks` - List tasks (any member)
/// - `PATCH /v1/projects/:id/tasks/:task_id` - Update a task
/// - `DELETE /v1/projects/:id/tasks/:task_id` - Delete a task + subtasks
///
/// Updates are field-gated: a `member` may change only `status`; `title`,
/// `description` and `assigned_to` are admin-only. Assigning fires a
/// notification after the write commits, skipped on self-assignment.

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use taskhive_shared::{
    auth::{access, Principal},
    consistency::{cascade, invariants},
    models::membership::MembershipRole,
    models::task::{CreateTask, Task, TaskChanges, TaskStatus},
    notify,
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    #[serde(default)]
    pub description: String,

    /// Assignee (must be a project member unless the actor is a super-admin)
    pub assigned_to: Uuid,
}

/// Update task request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title (admin-only)
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description (admin-only)
    pub description: Option<String>,

    /// Reassign (admin-only)
    pub assigned_to: Option<Uuid>,

    /// New status (any member)
    pub status: Option<TaskStatus>,
}

/// Create a task
///
/// # Errors
///
/// - `403 Forbidden`: Principal is not the project admin or a super-admin
/// - `422 Unprocessable Entity`: Assignee is not a project member
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_error)?;

    let actor = access::evaluate(
        &state.db,
        &principal,
        id,
        Some(MembershipRole::ProjectAdmin),
    )
    .await?;

    invariants::ensure_assignee_is_member(&state.db, actor, id, req.assigned_to).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id: id,
            title: req.title,
            description: req.description,
            assigned_to: req.assigned_to,
            assigned_by: principal.user_id(),
        },
    )
    .await?;

    // Post-commit, best-effort
    if let Some(event) = notify::task_assigned(
        task.assigned_by,
        task.assigned_to,
        task.id,
        task.project_id,
        &task.title,
    ) {
        notify::emit(&state.db, event).await;
    }

    Ok(Json(task))
}

/// List all tasks in a project
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    access::evaluate(&state.db, &principal, id, None).await?;

    let tasks = Task::list_by_project(&state.db, id).await?;
    Ok(Json(tasks))
}

/// Update a task
///
/// # Errors
///
/// - `403 Forbidden`: A `member` touched an admin-only field
/// - `404 Not Found`: Task does not exist in this project
/// - `422 Unprocessable Entity`: New assignee is not a project member
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_error)?;

    let actor = access::evaluate(&state.db, &principal, id, None).await?;

    let existing = Task::find_by_id(&state.db, task_id)
        .await?
        .filter(|t| t.project_id == id)
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let changes = TaskChanges {
        title: req.title,
        description: req.description,
        assigned_to: req.assigned_to,
        status: req.status,
    };

    access::authorize_task_update(actor, &changes)?;

    let reassigned_to = changes.assigned_to.filter(|u| *u != existing.assigned_to);
    if let Some(assignee) = reassigned_to {
        invariants::ensure_assignee_is_member(&state.db, actor, id, assignee).await?;
    }

    let task = Task::apply_changes(&state.db, task_id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if reassigned_to.is_some() {
        if let Some(event) = notify::task_assigned(
            principal.user_id(),
            task.assigned_to,
            task.id,
            task.project_id,
            &task.title,
        ) {
            notify::emit(&state.db, event).await;
        }
    }

    Ok(Json(task))
}

/// Delete a task and its subtasks
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    access::evaluate(
        &state.db,
        &principal,
        id,
        Some(MembershipRole::ProjectAdmin),
    )
    .await?;

    Task::find_by_id(&state.db, task_id)
        .await?
        .filter(|t| t.project_id == id)
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    cascade::delete_task(&state.db, task_id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
