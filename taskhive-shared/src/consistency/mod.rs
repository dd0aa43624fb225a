/// The Consistency Coordinator
///
/// Everything that keeps the membership graph and the entity stores
/// mutually consistent lives here:
///
/// - `invariants`: structural rules checked at write time (singleton
///   project-admin, leave-project guard, assignee eligibility,
///   email-verified member adds)
/// - `cascade`: ordered cascading-deletion protocols for projects, tasks,
///   documents and users
///
/// The invariants that close races (singleton admin, membership and name
/// uniqueness) are guaranteed by store-level constraints; the functions in
/// `invariants` are the business rules a constraint cannot express, plus
/// fast-fail pre-checks.

pub mod cascade;
pub mod invariants;

pub use cascade::{delete_document, delete_project, delete_task, delete_user, UserPurgeReport};
pub use invariants::{
    ensure_assignee_is_member, ensure_may_leave, ensure_member_addable,
    ensure_may_modify_membership,
};
