/// Notification model and database operations
///
/// Notification rows are written by the Notification Emitter (`notify`)
/// after a triggering mutation commits. Writing them is best-effort: a
/// failed insert is logged and swallowed, never surfaced to the request
/// that triggered it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A task was assigned to the recipient
    TaskAssigned,
}

/// Notification model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// Recipient
    pub user_id: Uuid,

    /// Kind of notification
    pub kind: NotificationKind,

    /// Short title
    pub title: String,

    /// Body text
    pub message: String,

    /// In-app link target
    pub link: String,

    /// Whether the recipient has read it
    pub read: bool,

    /// Related project, if any
    pub project_id: Option<Uuid>,

    /// Related task, if any
    pub task_id: Option<Uuid>,

    /// User whose action triggered the notification, if any
    pub actor_id: Option<Uuid>,

    /// When the notification was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// Recipient
    pub user_id: Uuid,

    /// Kind
    pub kind: NotificationKind,

    /// Title
    pub title: String,

    /// Body text
    pub message: String,

    /// Link target (defaults to empty)
    #[serde(default)]
    pub link: String,

    /// Related project
    pub project_id: Option<Uuid>,

    /// Related task
    pub task_id: Option<Uuid>,

    /// Triggering user
    pub actor_id: Option<Uuid>,
}

impl Notification {
    /// Persists a notification
    pub async fn create(pool: &PgPool, data: CreateNotification) -> Result<Self, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, kind, title, message, link,
                                       project_id, task_id, actor_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, kind, title, message, link, read,
                      project_id, task_id, actor_id, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.kind)
        .bind(data.title)
        .bind(data.message)
        .bind(data.link)
        .bind(data.project_id)
        .bind(data.task_id)
        .bind(data.actor_id)
        .fetch_one(pool)
        .await?;

        Ok(notification)
    }

    /// Lists a user's notifications, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, kind, title, message, link, read,
                   project_id, task_id, actor_id, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Marks one of the user's notifications as read
    ///
    /// Scoped to the recipient so one user cannot mark another's rows.
    ///
    /// # Returns
    ///
    /// True if a notification was updated, false if none matched
    pub async fn mark_read(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&NotificationKind::TaskAssigned).unwrap();
        assert_eq!(json, "\"task_assigned\"");
    }
}
