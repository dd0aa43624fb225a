/// Database models and entity stores
///
/// Each module owns one durable collection keyed by id:
///
/// - `user`: user accounts (global super-admin flag lives here)
/// - `project`: projects with case-insensitively unique names
/// - `membership`: the (user, project) -> role authorization edge
/// - `task`: tasks within a project
/// - `subtask`: subtasks within a task
/// - `note`: free-form project notes
/// - `document`: uploaded files referencing external blobs
/// - `notification`: per-user notification rows

pub mod document;
pub mod membership;
pub mod note;
pub mod notification;
pub mod project;
pub mod subtask;
pub mod task;
pub mod user;
