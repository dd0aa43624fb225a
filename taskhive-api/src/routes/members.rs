/// Membership management endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects/:id/members` - List members (any member)
/// - `POST /v1/projects/:id/members` - Add a member by email (admin)
/// - `PATCH /v1/projects/:id/members/:user_id` - Change a member's role
/// - `DELETE /v1/projects/:id/members/:user_id` - Remove a member
/// - `POST /v1/projects/:id/leave` - Leave the project (self)
///
/// The singleton-admin and duplicate-membership invariants are closed at
/// the store (partial unique index, `(project_id, user_id)` key); handlers
/// surface those violations as 409 without pre-checking.

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
    consistency::invariants,
    models::membership::{CreateMembership, Membership, MembershipRole},
    models::user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Add member request
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    /// Email of the user to add (must already have an account)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Role to grant (defaults to `member`)
    pub role: Option<MembershipRole>,
}

/// Update member role request
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    /// New role
    pub role: MembershipRole,
}

/// List all members of a project
pub async fn list_members(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Membership>>> {
    access::evaluate(&state.db, &principal, id, None).await?;

    let members = Membership::list_by_project(&state.db, id).await?;
    Ok(Json(members))
}

/// Add a user to a project by email
///
/// Project admins may only add users whose email is verified; super-admins
/// may add anyone. Duplicate adds and second admins fail with 409 at the
/// store.
///
/// # Errors
///
/// - `403 Forbidden`: Principal is not the project admin or a super-admin
/// - `404 Not Found`: No account with that email
/// - `409 Conflict`: Already a member, or the project already has an admin
/// - `422 Unprocessable Entity`: Target's email is not verified
pub async fn add_member(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<Membership>> {
    req.validate().map_err(validation_error)?;

    let actor = access::evaluate(
        &state.db,
        &principal,
        id,
        Some(MembershipRole::ProjectAdmin),
    )
    .await?;

    let target = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    invariants::ensure_member_addable(actor, &target)?;

    let membership = Membership::create(
        &state.db,
        CreateMembership {
            project_id: id,
            user_id: target.id,
            role: req.role.unwrap_or(MembershipRole::Member),
        },
    )
    .await?;

    Ok(Json(membership))
}

/// Change a member's role
///
/// Promoting to `project_admin` races the partial unique index; at most one
/// concurrent promotion succeeds. Demoting an existing `project_admin`
/// requires super-admin privilege.
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateMemberRoleRequest>,
) -> ApiResult<Json<Membership>> {
    access::evaluate(
        &state.db,
        &principal,
        id,
        Some(MembershipRole::ProjectAdmin),
    )
    .await?;

    let current_role = Membership::get_role(&state.db, id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Membership not found".to_string()))?;

    invariants::ensure_may_modify_membership(&principal, current_role)?;

    let membership = Membership::update_role(&state.db, id, user_id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Membership not found".to_string()))?;

    Ok(Json(membership))
}

/// Remove a member from a project
///
/// Removing a `project_admin` requires super-admin privilege; an admin's own
/// exit is the leave operation.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    access::evaluate(
        &state.db,
        &principal,
        id,
        Some(MembershipRole::ProjectAdmin),
    )
    .await?;

    let target_role = Membership::get_role(&state.db, id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Membership not found".to_string()))?;

    invariants::ensure_may_modify_membership(&principal, target_role)?;

    Membership::delete(&state.db, id, user_id).await?;

    Ok(Json(serde_json::json!({ "removed": true })))
}

/// Leave a project
///
/// A `project_admin` whose project has no other admin may not leave.
///
/// # Errors
///
/// - `404 Not Found`: Principal is not a member
/// - `422 Unprocessable Entity`: Principal is the sole project admin
pub async fn leave_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    invariants::ensure_may_leave(&state.db, id, principal.user_id()).await?;

    Membership::delete(&state.db, id, principal.user_id()).await?;

    Ok(Json(serde_json::json!({ "left": true })))
}
