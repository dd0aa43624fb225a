/// Principal and project-actor types
///
/// The principal is resolved once, at the authentication boundary, into a
/// tagged variant instead of a `(user_id, is_super_admin)` pair, so
/// downstream code pattern-matches a capability rather than re-branching on
/// a boolean flag at every call site.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated actor performing a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    /// Global super-admin: bypasses all membership checks, holds no
    /// memberships of its own
    SuperAdmin {
        /// The super-admin's user ID
        user_id: Uuid,
    },

    /// Regular user: authority over a project comes only from a Membership
    User {
        /// The user's ID
        user_id: Uuid,
    },
}

impl Principal {
    /// The acting user's ID, regardless of variant
    pub fn user_id(&self) -> Uuid {
        match self {
            Principal::SuperAdmin { user_id } | Principal::User { user_id } => *user_id,
        }
    }

    /// Whether this principal is the global super-admin
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Principal::SuperAdmin { .. })
    }
}

/// Capability the Access Evaluator hands to downstream code for one
/// (principal, project) pair
///
/// Downstream functions match on this instead of consulting the membership
/// table again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectActor {
    /// Super-admin acting on the project without a membership
    SuperAdmin,

    /// The project's `project_admin`
    Admin,

    /// A regular `member`
    Member,
}

impl ProjectActor {
    /// Whether membership-scoped business rules (assignee eligibility,
    /// email-verified member adds) are bypassed for this actor
    pub fn bypasses_membership_rules(&self) -> bool {
        matches!(self, ProjectActor::SuperAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_user_id() {
        let id = Uuid::new_v4();
        assert_eq!(Principal::SuperAdmin { user_id: id }.user_id(), id);
        assert_eq!(Principal::User { user_id: id }.user_id(), id);
    }

    #[test]
    fn test_principal_is_super_admin() {
        let id = Uuid::new_v4();
        assert!(Principal::SuperAdmin { user_id: id }.is_super_admin());
        assert!(!Principal::User { user_id: id }.is_super_admin());
    }

    #[test]
    fn test_actor_capabilities() {
        assert!(ProjectActor::SuperAdmin.bypasses_membership_rules());
        assert!(!ProjectActor::Admin.bypasses_membership_rules());
        assert!(!ProjectActor::Member.bypasses_membership_rules());
    }
}
