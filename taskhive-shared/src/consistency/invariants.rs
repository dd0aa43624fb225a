/// Structural invariants checked at write time
///
/// The two invariants that must close races, singleton project-admin and
/// membership uniqueness, are enforced by the database (the
/// `memberships_single_admin` partial unique index and the
/// `(project_id, user_id)` key); violations surface as `Conflict` through
/// the central `sqlx::Error` conversion. The checks in this module are the
/// rules a constraint cannot express: who may touch an admin's membership,
/// who may leave, and who may be assigned work.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::principal::{Principal, ProjectActor};
use crate::error::{CoreError, CoreResult};
use crate::models::membership::{Membership, MembershipRole};
use crate::models::user::User;

/// Checks that a task/subtask assignee holds a membership in the project
///
/// Bypassed when the actor is a super-admin (administrative override).
///
/// # Errors
///
/// `InvalidOperation("assignee is not a project member")` if the assignee
/// holds no membership.
pub async fn ensure_assignee_is_member(
    pool: &PgPool,
    actor: ProjectActor,
    project_id: Uuid,
    assignee: Uuid,
) -> CoreResult<()> {
    if actor.bypasses_membership_rules() {
        return Ok(());
    }

    let membership = Membership::find(pool, project_id, assignee).await?;
    if membership.is_none() {
        return Err(CoreError::InvalidOperation(
            "assignee is not a project member".to_string(),
        ));
    }

    Ok(())
}

/// Checks that the actor may change or remove a membership with the given
/// role
///
/// Demoting or removing a `project_admin` requires super-admin privilege;
/// the admin's own escape hatch is the leave operation, which has its own
/// guard.
pub fn ensure_may_modify_membership(
    principal: &Principal,
    target_role: MembershipRole,
) -> CoreResult<()> {
    if target_role.is_admin() && !principal.is_super_admin() {
        return Err(CoreError::forbidden(
            "only a super-admin may modify a project admin",
        ));
    }

    Ok(())
}

/// Checks that a user may be added to a project by this actor
///
/// Project admins may only add users whose email is verified; super-admins
/// may add anyone.
///
/// # Errors
///
/// `InvalidOperation("user's email is not verified")`
pub fn ensure_member_addable(actor: ProjectActor, target: &User) -> CoreResult<()> {
    if actor.bypasses_membership_rules() {
        return Ok(());
    }

    if !target.is_email_verified {
        return Err(CoreError::InvalidOperation(
            "user's email is not verified".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a user may leave a project
///
/// A `project_admin` whose project has no other admin may not leave; that
/// would orphan the project with zero admins. Super-admin removal of an
/// admin goes through the member-removal path instead and is exempt
/// (super-admins hold no membership and never count toward "only admin").
///
/// # Errors
///
/// - `NotFound("membership")` if the user is not a member
/// - `InvalidOperation` if the user is the sole project admin
pub async fn ensure_may_leave(pool: &PgPool, project_id: Uuid, user_id: Uuid) -> CoreResult<()> {
    let role = Membership::get_role(pool, project_id, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("membership"))?;

    if role.is_admin() {
        let other_admins = Membership::count_other_admins(pool, project_id, user_id).await?;
        if other_admins == 0 {
            return Err(CoreError::InvalidOperation(
                "the only project admin cannot leave the project".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(verified: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            is_super_admin: false,
            is_email_verified: verified,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_super_admin_touches_admin_memberships() {
        let admin_principal = Principal::User {
            user_id: Uuid::new_v4(),
        };
        let super_admin = Principal::SuperAdmin {
            user_id: Uuid::new_v4(),
        };

        assert!(matches!(
            ensure_may_modify_membership(&admin_principal, MembershipRole::ProjectAdmin),
            Err(CoreError::Forbidden(_))
        ));
        assert!(
            ensure_may_modify_membership(&super_admin, MembershipRole::ProjectAdmin).is_ok()
        );
        assert!(ensure_may_modify_membership(&admin_principal, MembershipRole::Member).is_ok());
    }

    #[test]
    fn test_unverified_user_not_addable_by_admin() {
        assert!(matches!(
            ensure_member_addable(ProjectActor::Admin, &user(false)),
            Err(CoreError::InvalidOperation(_))
        ));
        assert!(ensure_member_addable(ProjectActor::Admin, &user(true)).is_ok());
    }

    #[test]
    fn test_super_admin_may_add_unverified_user() {
        assert!(ensure_member_addable(ProjectActor::SuperAdmin, &user(false)).is_ok());
    }
}
