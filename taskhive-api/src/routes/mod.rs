/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `projects`: Project CRUD
/// - `members`: Membership management (add, role change, remove, leave)
/// - `tasks`: Task CRUD
/// - `subtasks`: SubTask CRUD
/// - `notes`: Note CRUD
/// - `documents`: Document upload/list/delete
/// - `notifications`: Notification list / mark-read
/// - `users`: Profile endpoints and super-admin user deletion

pub mod documents;
pub mod health;
pub mod members;
pub mod notes;
pub mod notifications;
pub mod projects;
pub mod subtasks;
pub mod tasks;
pub mod users;
