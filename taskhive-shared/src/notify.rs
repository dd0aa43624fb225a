/// The Notification Emitter
///
/// Fire-and-forget side-effect hook invoked after a mutating operation
/// commits. Mutating code builds a `NotificationEvent` (or decides not to,
/// via the pure helpers here), and `emit` persists it. An emitter failure
/// is logged and swallowed; it never fails or rolls back the triggering
/// request.
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::notify::{self, NotificationEvent};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, task_id: Uuid, project_id: Uuid, assigner: Uuid, assignee: Uuid) {
/// // After the task insert commits:
/// if let Some(event) = notify::task_assigned(assigner, assignee, task_id, project_id, "Ship it") {
///     notify::emit(&pool, event).await;
/// }
/// # }
/// ```

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::models::notification::{CreateNotification, Notification, NotificationKind};

/// A notification-worthy event produced by a mutating operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A task was assigned to a user by someone else
    TaskAssigned {
        /// Recipient (the assignee)
        assignee: Uuid,

        /// User who made the assignment
        assigner: Uuid,

        /// The task in question
        task_id: Uuid,

        /// The task's project
        project_id: Uuid,

        /// Task title, for the message body
        task_title: String,
    },
}

/// Decides whether a task assignment should notify anyone
///
/// Self-assignment is not news: returns `None` when the assigner is the
/// assignee.
pub fn task_assigned(
    assigner: Uuid,
    assignee: Uuid,
    task_id: Uuid,
    project_id: Uuid,
    task_title: &str,
) -> Option<NotificationEvent> {
    if assigner == assignee {
        return None;
    }

    Some(NotificationEvent::TaskAssigned {
        assignee,
        assigner,
        task_id,
        project_id,
        task_title: task_title.to_string(),
    })
}

/// Persists a notification for the given event, best-effort
///
/// Failure here is logged at `warn` and swallowed; the triggering mutation
/// has already committed and must not be affected.
pub async fn emit(pool: &PgPool, event: NotificationEvent) {
    let data = match event {
        NotificationEvent::TaskAssigned {
            assignee,
            assigner,
            task_id,
            project_id,
            task_title,
        } => CreateNotification {
            user_id: assignee,
            kind: NotificationKind::TaskAssigned,
            title: "Task assigned to you".to_string(),
            message: format!("You have been assigned the task \"{}\"", task_title),
            link: format!("/projects/{}/tasks/{}", project_id, task_id),
            project_id: Some(project_id),
            task_id: Some(task_id),
            actor_id: Some(assigner),
        },
    };

    if let Err(e) = Notification::create(pool, data).await {
        warn!("Failed to persist notification: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_assignment_is_skipped() {
        let user = Uuid::new_v4();
        assert!(task_assigned(user, user, Uuid::new_v4(), Uuid::new_v4(), "t").is_none());
    }

    #[test]
    fn test_assignment_to_someone_else_fires() {
        let assigner = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let task_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();

        let event = task_assigned(assigner, assignee, task_id, project_id, "Ship it").unwrap();
        match event {
            NotificationEvent::TaskAssigned {
                assignee: to,
                assigner: by,
                task_title,
                ..
            } => {
                assert_eq!(to, assignee);
                assert_eq!(by, assigner);
                assert_eq!(task_title, "Ship it");
            }
        }
    }
}
