/// Note endpoints
///
/// # Endpoints
///
/// - `POST /v1/projects/:id/notes` - Create a note (any member)
/// - `GET /v1/projects/:id/notes` - List notes (any member)
/// - `DELETE /v1/projects/:id/notes/:note_id` - Delete a note (creator,
///   project admin, or super-admin)

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
    auth::{access, Principal, ProjectActor},
    models::note::{CreateNote, Note},
};
use uuid::Uuid;
use validator::Validate;

/// Create note request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    /// Note content
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}

/// Create a note in a project
pub async fn create_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateNoteRequest>,
) -> ApiResult<Json<Note>> {
    req.validate().map_err(validation_error)?;

    access::evaluate(&state.db, &principal, id, None).await?;

    let note = Note::create(
        &state.db,
        CreateNote {
            project_id: id,
            content: req.content,
            created_by: principal.user_id(),
        },
    )
    .await?;

    Ok(Json(note))
}

/// List all notes in a project
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Note>>> {
    access::evaluate(&state.db, &principal, id, None).await?;

    let notes = Note::list_by_project(&state.db, id).await?;
    Ok(Json(notes))
}

/// Delete a note
///
/// # Errors
///
/// - `403 Forbidden`: Principal is neither the creator, the project admin,
///   nor a super-admin
/// - `404 Not Found`: Note does not exist in this project
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, note_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let actor = access::evaluate(&state.db, &principal, id, None).await?;

    let note = Note::find_by_id(&state.db, note_id)
        .await?
        .filter(|n| n.project_id == id)
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    let may_delete = match actor {
        ProjectActor::SuperAdmin | ProjectActor::Admin => true,
        ProjectActor::Member => note.created_by == principal.user_id(),
    };
    if !may_delete {
        return Err(ApiError::Forbidden(
            "only the creator or the project admin may delete a note".to_string(),
        ));
    }

    Note::delete(&state.db, note_id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
