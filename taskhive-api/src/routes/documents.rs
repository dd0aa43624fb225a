/// Document endpoints
///
/// # Endpoints
///
/// - `POST /v1/projects/:id/documents` - Upload a document (any member)
/// - `GET /v1/projects/:id/documents` - List documents (any member)
/// - `DELETE /v1/projects/:id/documents/:document_id` - Delete a document
///   (uploader, project admin, or super-admin)
///
/// Document bytes go to the external blob store; the database row records
/// metadata and the opaque blob handle. Upload writes the blob first, then
/// the row; if the row insert fails the blob is released best-effort so
/// nothing leaks.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use taskhive_shared::{
    auth::{access, Principal, ProjectActor},
    blob::BlobKind,
    consistency::cascade,
    models::document::{CreateDocument, Document},
};
use tracing::warn;
use uuid::Uuid;

/// Upload a document
///
/// Expects a multipart body with a single `file` field carrying the bytes,
/// filename and content type.
///
/// # Errors
///
/// - `400 Bad Request`: No `file` field in the multipart body
/// - `403 Forbidden`: Principal is not a member of the project
/// - `503 Service Unavailable`: Blob store rejected the upload
pub async fn upload_document(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<Document>> {
    access::evaluate(&state.db, &principal, id, None).await?;

    let mut upload: Option<(String, String, bytes::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field
                .file_name()
                .unwrap_or("unnamed")
                .to_string();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file field: {}", e)))?;
            upload = Some((file_name, mime_type, bytes));
        }
    }

    let (file_name, mime_type, bytes) = upload
        .ok_or_else(|| ApiError::BadRequest("Multipart field 'file' is required".to_string()))?;

    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    let file_size = bytes.len() as i64;
    let stored = state.blob.put(bytes, "documents").await?;

    let file_type = mime_type
        .split('/')
        .next_back()
        .unwrap_or("bin")
        .to_string();

    let document = Document::create(
        &state.db,
        CreateDocument {
            project_id: id,
            uploaded_by: principal.user_id(),
            name: file_name,
            file_ref: stored.id.clone(),
            file_url: stored.url,
            file_type,
            file_size,
            mime_type,
        },
    )
    .await;

    match document {
        Ok(document) => Ok(Json(document)),
        Err(e) => {
            // The blob is already stored; release it so nothing leaks.
            if let Err(release_err) = state.blob.delete(&stored.id, BlobKind::Document).await {
                warn!(
                    file_ref = %stored.id,
                    "Blob release failed after aborted upload: {}", release_err
                );
            }
            Err(e.into())
        }
    }
}

/// List all documents in a project
pub async fn list_documents(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Document>>> {
    access::evaluate(&state.db, &principal, id, None).await?;

    let documents = Document::list_by_project(&state.db, id).await?;
    Ok(Json(documents))
}

/// Delete a document and release its blob
///
/// # Errors
///
/// - `403 Forbidden`: Principal is neither the uploader, the project admin,
///   nor a super-admin
/// - `404 Not Found`: Document does not exist in this project
/// - `503 Service Unavailable`: Row removed but blob release failed
pub async fn delete_document(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, document_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let actor = access::evaluate(&state.db, &principal, id, None).await?;

    let document = Document::find_by_id(&state.db, document_id)
        .await?
        .filter(|d| d.project_id == id)
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    let may_delete = match actor {
        ProjectActor::SuperAdmin | ProjectActor::Admin => true,
        ProjectActor::Member => document.uploaded_by == Some(principal.user_id()),
    };
    if !may_delete {
        return Err(ApiError::Forbidden(
            "only the uploader or the project admin may delete a document".to_string(),
        ));
    }

    cascade::delete_document(&state.db, &state.blob, &document).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
