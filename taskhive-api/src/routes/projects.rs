/// Project endpoints
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create project (any authenticated user)
/// - `GET /v1/projects` - List projects visible to the principal
/// - `GET /v1/projects/:id` - Get a project (members and super-admins)
/// - `PATCH /v1/projects/:id` - Rename / describe / complete (admin)
/// - `DELETE /v1/projects/:id` - Cascade-delete a project (admin)
///
/// A non-super-admin creator becomes the project's `project_admin` in the
/// same transaction, so no project ever exists without an admin. A
/// super-admin creator gets no membership and the project starts empty.

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
    consistency::cascade,
    models::membership::MembershipRole,
    models::project::{CreateProject, Project, UpdateProject},
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name (case-insensitively unique)
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: String,
}

/// Update project request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// Mark complete / reopen
    pub is_completed: Option<bool>,
}

/// Create a new project
///
/// # Errors
///
/// - `409 Conflict`: Name already taken (case-insensitive)
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate().map_err(validation_error)?;

    let project = Project::create_with_admin(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description,
            created_by: principal.user_id(),
        },
        principal.is_super_admin(),
    )
    .await?;

    Ok(Json(project))
}

/// List projects
///
/// Members see the projects they belong to; super-admins see everything.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = if principal.is_super_admin() {
        Project::list_all(&state.db).await?
    } else {
        Project::list_for_member(&state.db, principal.user_id()).await?
    };

    Ok(Json(projects))
}

/// Get a single project
pub async fn get_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    access::evaluate(&state.db, &principal, id, None).await?;

    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Update a project (rename, re-describe, complete/reopen)
///
/// # Errors
///
/// - `403 Forbidden`: Principal is not the project admin or a super-admin
/// - `404 Not Found`: Project does not exist
/// - `409 Conflict`: Rename collides with an existing project name
pub async fn update_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate().map_err(validation_error)?;

    access::evaluate(
        &state.db,
        &principal,
        id,
        Some(MembershipRole::ProjectAdmin),
    )
    .await?;

    let project = Project::update(
        &state.db,
        id,
        UpdateProject {
            name: req.name,
            description: req.description,
            is_completed: req.is_completed,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Delete a project and everything it owns
///
/// Runs the ordered cascade (subtasks, tasks, memberships, notes, documents,
/// project) in one transaction, then releases document blobs best-effort.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    access::evaluate(
        &state.db,
        &principal,
        id,
        Some(MembershipRole::ProjectAdmin),
    )
    .await?;

    cascade::delete_project(&state.db, &state.blob, id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
