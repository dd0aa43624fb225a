/// Membership model and database operations
///
/// A Membership is the edge record linking a user to a project with a role.
/// It is the authorization graph the Access Evaluator walks: super-admins
/// never hold memberships and bypass this table entirely.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE membership_role AS ENUM ('project_admin', 'member');
///
/// CREATE TABLE memberships (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id),
///     user_id UUID NOT NULL REFERENCES users(id),
///     role membership_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (project_id, user_id)
/// );
///
/// CREATE UNIQUE INDEX memberships_single_admin
///     ON memberships (project_id)
///     WHERE role = 'project_admin';
/// ```
///
/// The `(project_id, user_id)` key closes the duplicate-add race and the
/// partial unique index enforces the singleton-admin invariant: at most one
/// `project_admin` per project, even under concurrent promotions. Both are
/// store-level guarantees; application pre-checks are fast-fails only.
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::membership::{CreateMembership, Membership, MembershipRole};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let membership = Membership::create(&pool, CreateMembership {
///     project_id,
///     user_id,
///     role: MembershipRole::Member,
/// }).await?;
///
/// let role = Membership::get_role(&pool, project_id, user_id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role a user holds within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "membership_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    /// Manages the project: members, tasks, notes, documents, deletion.
    /// At most one per project (singleton-admin invariant).
    ProjectAdmin,

    /// Regular collaborator; may mutate only the status/completion fields
    /// of tasks and subtasks
    Member,
}

impl MembershipRole {
    /// Converts role to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::ProjectAdmin => "project_admin",
            MembershipRole::Member => "member",
        }
    }

    /// Whether this role administers the project
    pub fn is_admin(&self) -> bool {
        matches!(self, MembershipRole::ProjectAdmin)
    }
}

/// Membership model representing a user-project relationship with a role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Unique membership ID
    pub id: Uuid,

    /// Project this membership belongs to
    pub project_id: Uuid,

    /// User holding the membership
    pub user_id: Uuid,

    /// Role within the project
    pub role: MembershipRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role to assign (defaults to Member)
    #[serde(default = "default_role")]
    pub role: MembershipRole,
}

fn default_role() -> MembershipRole {
    MembershipRole::Member
}

impl Membership {
    /// Creates a new membership (adds a user to a project)
    ///
    /// # Errors
    ///
    /// Returns a database error on constraint violation: duplicate
    /// `(project, user)` pair, or a second `project_admin` for the project
    /// (`memberships_single_admin`). Callers map these to `Conflict` via
    /// `CoreError`.
    pub async fn create(pool: &PgPool, data: CreateMembership) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (project_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, user_id, role, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Finds a specific membership by project and user
    pub async fn find(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, project_id, user_id, role, created_at
            FROM memberships
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Gets a user's role in a project, if they are a member
    pub async fn get_role(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MembershipRole>, sqlx::Error> {
        let role: Option<MembershipRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM memberships
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Updates a user's role in a project
    ///
    /// A promotion to `project_admin` that races another admin hits the
    /// `memberships_single_admin` index and fails with a unique-constraint
    /// violation; exactly one of two concurrent promotions succeeds.
    ///
    /// # Returns
    ///
    /// The updated membership if found, None if the membership doesn't exist
    pub async fn update_role(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships
            SET role = $3
            WHERE project_id = $1 AND user_id = $2
            RETURNING id, project_id, user_id, role, created_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Deletes a membership (removes a user from a project)
    ///
    /// # Returns
    ///
    /// True if a membership was deleted, false if none existed
    pub async fn delete(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM memberships WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all members of a project
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, project_id, user_id, role, created_at
            FROM memberships
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Counts `project_admin` memberships in a project held by anyone other
    /// than `user_id`
    ///
    /// Used by the leave-project guard: a `project_admin` whose project has
    /// no other admin may not leave. Super-admins hold no membership and
    /// never count toward this total.
    pub async fn count_other_admins(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM memberships
            WHERE project_id = $1 AND role = 'project_admin' AND user_id <> $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_role_as_str() {
        assert_eq!(MembershipRole::ProjectAdmin.as_str(), "project_admin");
        assert_eq!(MembershipRole::Member.as_str(), "member");
    }

    #[test]
    fn test_is_admin() {
        assert!(MembershipRole::ProjectAdmin.is_admin());
        assert!(!MembershipRole::Member.is_admin());
    }

    #[test]
    fn test_create_membership_default_role() {
        assert_eq!(default_role(), MembershipRole::Member);
    }

    #[test]
    fn test_role_serde_round_trip() {
        let json = serde_json::to_string(&MembershipRole::ProjectAdmin).unwrap();
        assert_eq!(json, "\"project_admin\"");
        let role: MembershipRole = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(role, MembershipRole::Member);
    }

    // Database-backed invariant tests live in taskhive-api/tests.
}
