/// The Access Evaluator
///
/// `evaluate` is the single decision point consulted before every resource
/// access: it turns a `(principal, project)` pair into a `ProjectActor`
/// capability or a `Forbidden` error. It never mutates state and is safe to
/// call repeatedly.
///
/// The narrower field-level rules for task and subtask updates are pure
/// functions over the update payloads (`authorize_task_update`,
/// `authorize_subtask_update`) so they can be tested without a database.
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::auth::access::evaluate;
/// use taskhive_shared::auth::principal::Principal;
/// use taskhive_shared::models::membership::MembershipRole;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, principal: Principal, project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// // Any member may read the project
/// let actor = evaluate(&pool, &principal, project_id, None).await?;
///
/// // Only the project_admin (or a super-admin) may manage members
/// let actor = evaluate(&pool, &principal, project_id, Some(MembershipRole::ProjectAdmin)).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use super::principal::{Principal, ProjectActor};
use crate::error::{CoreError, CoreResult};
use crate::models::membership::{Membership, MembershipRole};

/// Decides whether a principal may act on a project
///
/// - Super-admins always evaluate to `ProjectActor::SuperAdmin`, regardless
///   of `required_role`.
/// - Otherwise the principal must hold a Membership in the project, and if
///   `required_role` is given the membership role must match it exactly.
///
/// # Errors
///
/// - `Forbidden("no access to project")` if the principal holds no
///   membership
/// - `Forbidden("insufficient role")` if the role does not match
///   `required_role`
/// - `Dependency` if the membership lookup fails
pub async fn evaluate(
    pool: &PgPool,
    principal: &Principal,
    project_id: Uuid,
    required_role: Option<MembershipRole>,
) -> CoreResult<ProjectActor> {
    if principal.is_super_admin() {
        return Ok(ProjectActor::SuperAdmin);
    }

    let role = Membership::get_role(pool, project_id, principal.user_id())
        .await?
        .ok_or_else(|| CoreError::forbidden("no access to project"))?;

    if let Some(required) = required_role {
        if role != required {
            return Err(CoreError::forbidden("insufficient role"));
        }
    }

    Ok(match role {
        MembershipRole::ProjectAdmin => ProjectActor::Admin,
        MembershipRole::Member => ProjectActor::Member,
    })
}

/// Checks which task fields this actor may change
///
/// A `member` may mutate only `status`; `title`, `description` and
/// `assigned_to` are reserved for admins and super-admins.
pub fn authorize_task_update(
    actor: ProjectActor,
    changes: &crate::models::task::TaskChanges,
) -> CoreResult<()> {
    match actor {
        ProjectActor::SuperAdmin | ProjectActor::Admin => Ok(()),
        ProjectActor::Member => {
            if changes.touches_admin_fields() {
                Err(CoreError::forbidden(
                    "members may only update task status",
                ))
            } else {
                Ok(())
            }
        }
    }
}

/// Checks which subtask fields this actor may change
///
/// A `member` may mutate only `is_completed`.
pub fn authorize_subtask_update(
    actor: ProjectActor,
    changes: &crate::models::subtask::SubTaskChanges,
) -> CoreResult<()> {
    match actor {
        ProjectActor::SuperAdmin | ProjectActor::Admin => Ok(()),
        ProjectActor::Member => {
            if changes.touches_admin_fields() {
                Err(CoreError::forbidden(
                    "members may only update subtask completion",
                ))
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subtask::SubTaskChanges;
    use crate::models::task::{TaskChanges, TaskStatus};

    #[test]
    fn test_member_may_update_status_only() {
        let status_only = TaskChanges {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        assert!(authorize_task_update(ProjectActor::Member, &status_only).is_ok());

        let retitle = TaskChanges {
            title: Some("new".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            authorize_task_update(ProjectActor::Member, &retitle),
            Err(CoreError::Forbidden(_))
        ));

        let reassign = TaskChanges {
            assigned_to: Some(uuid::Uuid::new_v4()),
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };
        assert!(matches!(
            authorize_task_update(ProjectActor::Member, &reassign),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admins_may_update_any_task_field() {
        let everything = TaskChanges {
            title: Some("new".to_string()),
            description: Some("desc".to_string()),
            assigned_to: Some(uuid::Uuid::new_v4()),
            status: Some(TaskStatus::Done),
        };
        assert!(authorize_task_update(ProjectActor::Admin, &everything).is_ok());
        assert!(authorize_task_update(ProjectActor::SuperAdmin, &everything).is_ok());
    }

    #[test]
    fn test_member_may_update_subtask_completion_only() {
        let completion = SubTaskChanges {
            is_completed: Some(true),
            ..Default::default()
        };
        assert!(authorize_subtask_update(ProjectActor::Member, &completion).is_ok());

        let retitle = SubTaskChanges {
            title: Some("new".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            authorize_subtask_update(ProjectActor::Member, &retitle),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_may_clear_subtask_assignee() {
        let clear = SubTaskChanges {
            assigned_to: Some(None),
            ..Default::default()
        };
        assert!(authorize_subtask_update(ProjectActor::Admin, &clear).is_ok());
        assert!(matches!(
            authorize_subtask_update(ProjectActor::Member, &clear),
            Err(CoreError::Forbidden(_))
        ));
    }
}
