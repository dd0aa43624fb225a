/// User endpoints
///
/// # Endpoints
///
/// - `GET /v1/users/me` - Get the principal's profile
/// - `PATCH /v1/users/me` - Update email / username
/// - `DELETE /v1/users/:id` - Delete a user and sweep their data
///   (super-admin only; never self, never another super-admin)
///
/// User deletion is a destructive cascade, not a reassignment: the user's
/// memberships, assigned tasks (with their subtasks) and notes are removed,
/// and the response reports per-category counts.

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
    auth::Principal,
    consistency::cascade::{self, UserPurgeReport},
    models::user::{UpdateUser, User},
};
use uuid::Uuid;
use validator::Validate;

/// Update profile request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New email address (uniqueness enforced at the store)
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New username (uniqueness enforced at the store)
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: Option<String>,
}

/// Get the authenticated user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, principal.user_id())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Update the authenticated user's profile
///
/// # Errors
///
/// - `409 Conflict`: Email or username already taken
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    req.validate().map_err(validation_error)?;

    let user = User::update(
        &state.db,
        principal.user_id(),
        UpdateUser {
            email: req.email,
            username: req.username,
            is_email_verified: None,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Delete a user and sweep every store that references them
///
/// # Errors
///
/// - `403 Forbidden`: Principal is not a super-admin
/// - `404 Not Found`: User does not exist
/// - `422 Unprocessable Entity`: Self-deletion, or target is a super-admin
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserPurgeReport>> {
    let report = cascade::delete_user(&state.db, &principal, id).await?;
    Ok(Json(report))
}
