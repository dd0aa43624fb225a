/// SubTask endpoints
///
/// # Endpoints
///
/// - `POST /v1/tasks/:task_id/subtasks` - Create a subtask (admin)
/// - `GET /v1/tasks/:task_id/subtasks` - List subtasks (any member)
/// - `PATCH /v1/tasks/:task_id/subtasks/:subtask_id` - Update a subtask
/// - `DELETE /v1/tasks/:task_id/subtasks/:subtask_id` - Delete a subtask
///
/// The project is resolved through the parent task; access is evaluated
/// against that project. A `member` may change only `is_completed`.

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use taskhive_shared::{
    auth::{access, Principal},
    consistency::invariants,
    models::membership::MembershipRole,
    models::subtask::{CreateSubTask, SubTask, SubTaskChanges},
    models::task::Task,
};
use uuid::Uuid;
use validator::Validate;

/// Create subtask request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubTaskRequest {
    /// Subtask title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional assignee (must be a project member unless the actor is a
    /// super-admin)
    pub assigned_to: Option<Uuid>,
}

/// Update subtask request
///
/// `assigned_to` distinguishes absent (leave unchanged) from `null` (clear
/// the assignee) via the double Option.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSubTaskRequest {
    /// New title (admin-only)
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// Reassign or clear (admin-only)
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<Uuid>>,

    /// Completion flag (any member)
    pub is_completed: Option<bool>,
}

/// Maps a present-but-null JSON field to `Some(None)` so a request can
/// clear the assignee; an absent field stays `None` via `default`.
fn double_option<'de, D>(de: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}

/// Resolves the parent task, 404 if absent
async fn parent_task(pool: &PgPool, task_id: Uuid) -> ApiResult<Task> {
    Task::find_by_id(pool, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Create a subtask under a task
pub async fn create_subtask(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<CreateSubTaskRequest>,
) -> ApiResult<Json<SubTask>> {
    req.validate().map_err(validation_error)?;

    let task = parent_task(&state.db, task_id).await?;
    let actor = access::evaluate(
        &state.db,
        &principal,
        task.project_id,
        Some(MembershipRole::ProjectAdmin),
    )
    .await?;

    if let Some(assignee) = req.assigned_to {
        invariants::ensure_assignee_is_member(&state.db, actor, task.project_id, assignee).await?;
    }

    let subtask = SubTask::create(
        &state.db,
        CreateSubTask {
            task_id,
            title: req.title,
            assigned_to: req.assigned_to,
            created_by: principal.user_id(),
        },
    )
    .await?;

    Ok(Json(subtask))
}

/// List subtasks of a task
pub async fn list_subtasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<SubTask>>> {
    let task = parent_task(&state.db, task_id).await?;
    access::evaluate(&state.db, &principal, task.project_id, None).await?;

    let subtasks = SubTask::list_by_task(&state.db, task_id).await?;
    Ok(Json(subtasks))
}

/// Update a subtask
///
/// # Errors
///
/// - `403 Forbidden`: A `member` touched a field other than `is_completed`
/// - `404 Not Found`: Subtask does not exist under this task
/// - `422 Unprocessable Entity`: New assignee is not a project member
pub async fn update_subtask(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((task_id, subtask_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateSubTaskRequest>,
) -> ApiResult<Json<SubTask>> {
    req.validate().map_err(validation_error)?;

    let task = parent_task(&state.db, task_id).await?;
    let actor = access::evaluate(&state.db, &principal, task.project_id, None).await?;

    SubTask::find_by_id(&state.db, subtask_id)
        .await?
        .filter(|s| s.task_id == task_id)
        .ok_or_else(|| ApiError::NotFound("Subtask not found".to_string()))?;

    let changes = SubTaskChanges {
        title: req.title,
        assigned_to: req.assigned_to,
        is_completed: req.is_completed,
    };

    access::authorize_subtask_update(actor, &changes)?;

    if let Some(Some(assignee)) = changes.assigned_to {
        invariants::ensure_assignee_is_member(&state.db, actor, task.project_id, assignee).await?;
    }

    let subtask = SubTask::apply_changes(&state.db, subtask_id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subtask not found".to_string()))?;

    Ok(Json(subtask))
}

/// Delete a subtask
pub async fn delete_subtask(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((task_id, subtask_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = parent_task(&state.db, task_id).await?;
    access::evaluate(
        &state.db,
        &principal,
        task.project_id,
        Some(MembershipRole::ProjectAdmin),
    )
    .await?;

    SubTask::find_by_id(&state.db, subtask_id)
        .await?
        .filter(|s| s.task_id == task_id)
        .ok_or_else(|| ApiError::NotFound("Subtask not found".to_string()))?;

    SubTask::delete(&state.db, subtask_id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
