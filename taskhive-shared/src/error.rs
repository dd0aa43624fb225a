/// Common error taxonomy for the taskhive core
///
/// Every core operation returns `Result<T, CoreError>`. The taxonomy is
/// deliberately small:
///
/// - `Forbidden`: principal is known but lacks the role or ownership
/// - `NotFound`: resource or referenced id is absent
/// - `Conflict`: uniqueness or invariant violation (duplicate admin,
///   duplicate project name, duplicate membership)
/// - `InvalidOperation`: structurally valid request that violates a
///   business rule (sole admin leaving, assignee not a member)
/// - `Dependency`: datastore or blob store unavailable; retried by the
///   caller's I/O layer, never by the core
///
/// Unauthenticated requests never reach the core; the HTTP middleware
/// rejects them first.

use sqlx::error::ErrorKind;
use sqlx::Error as SqlxError;

/// Core result type alias
pub type CoreResult<T> = Result<T, CoreError>;

/// Error type shared by the Access Evaluator, Consistency Coordinator and
/// entity stores
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Principal lacks the role or ownership required for this resource
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource or referenced id does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Uniqueness or invariant violation
    #[error("conflict: {0}")]
    Conflict(String),

    /// Business-rule violation on a structurally valid request
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Datastore or blob store failure
    #[error("dependency failure: {0}")]
    Dependency(String),
}

impl CoreError {
    /// Shorthand for a `Forbidden` with a static reason
    pub fn forbidden(reason: impl Into<String>) -> Self {
        CoreError::Forbidden(reason.into())
    }

    /// Shorthand for a `NotFound` naming the missing resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        CoreError::NotFound(resource.into())
    }
}

/// Maps database errors into the core taxonomy.
///
/// Unique-constraint violations become `Conflict`: the constraint name
/// identifies the invariant that was raced (the partial unique index
/// `memberships_single_admin` closes concurrent admin promotions, the
/// `(project_id, user_id)` key closes duplicate membership adds, and the
/// CITEXT unique columns close duplicate names/emails). The
/// application-level pre-checks exist only as fast-fails; this conversion
/// is the guarantee.
///
/// Foreign-key violations become `NotFound`: the row referenced an id that
/// does not exist, which is a caller error about an absent resource, not a
/// uniqueness race. Everything else is a `Dependency` failure.
impl From<SqlxError> for CoreError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => CoreError::NotFound("resource".to_string()),
            SqlxError::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    CoreError::Conflict(conflict_message(db_err.constraint().unwrap_or("unknown")))
                }
                ErrorKind::ForeignKeyViolation => CoreError::NotFound(
                    missing_reference(db_err.constraint().unwrap_or("unknown")).to_string(),
                ),
                _ => CoreError::Dependency(format!("database error: {}", db_err)),
            },
            other => CoreError::Dependency(format!("database error: {}", other)),
        }
    }
}

/// Translates a violated constraint name into a caller-facing message
fn conflict_message(constraint: &str) -> String {
    match constraint {
        "memberships_single_admin" => "project already has an admin".to_string(),
        "memberships_project_id_user_id_key" => {
            "user is already a member of this project".to_string()
        }
        "projects_name_key" => "project name is already taken".to_string(),
        "users_email_key" => "email is already registered".to_string(),
        "users_username_key" => "username is already taken".to_string(),
        other => format!("constraint violation: {}", other),
    }
}

/// Names the resource a violated foreign key points at
///
/// Every foreign key in the schema references projects, tasks, or users;
/// the referencing column name is embedded in the constraint name.
fn missing_reference(constraint: &str) -> &'static str {
    if constraint.contains("project_id") {
        "project"
    } else if constraint.contains("task_id") {
        "task"
    } else {
        "user"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_messages_name_the_invariant() {
        assert_eq!(
            conflict_message("memberships_single_admin"),
            "project already has an admin"
        );
        assert_eq!(
            conflict_message("memberships_project_id_user_id_key"),
            "user is already a member of this project"
        );
        assert_eq!(
            conflict_message("projects_name_key"),
            "project name is already taken"
        );
        assert!(conflict_message("something_else").contains("something_else"));
    }

    #[test]
    fn test_missing_reference_names_the_absent_resource() {
        assert_eq!(missing_reference("tasks_assigned_to_fkey"), "user");
        assert_eq!(missing_reference("subtasks_created_by_fkey"), "user");
        assert_eq!(missing_reference("tasks_project_id_fkey"), "project");
        assert_eq!(missing_reference("subtasks_task_id_fkey"), "task");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: CoreError = SqlxError::RowNotFound.into();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_display_prefixes_category() {
        assert_eq!(
            CoreError::forbidden("no access to project").to_string(),
            "forbidden: no access to project"
        );
        assert_eq!(CoreError::not_found("task").to_string(), "task not found");
        assert_eq!(
            CoreError::InvalidOperation("assignee is not a project member".into()).to_string(),
            "invalid operation: assignee is not a project member"
        );
    }
}
