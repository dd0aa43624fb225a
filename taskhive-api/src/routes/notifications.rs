/// Notification endpoints
///
/// # Endpoints
///
/// - `GET /v1/notifications` - List the principal's notifications
/// - `POST /v1/notifications/:id/read` - Mark one as read
///
/// Notifications are strictly per-recipient; the mark-read query is scoped
/// to the principal so one user can never touch another's notifications.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use taskhive_shared::{auth::Principal, models::notification::Notification};
use uuid::Uuid;

/// List the principal's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = Notification::list_by_user(&state.db, principal.user_id()).await?;
    Ok(Json(notifications))
}

/// Mark a notification as read
///
/// # Errors
///
/// - `404 Not Found`: No such notification for this principal
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let updated = Notification::mark_read(&state.db, id, principal.user_id()).await?;
    if !updated {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "read": true })))
}
