/// User model and database operations
///
/// Users belong to projects via the Membership model. The global
/// `is_super_admin` flag marks principals that bypass membership checks
/// entirely; super-admins never hold memberships.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     username CITEXT NOT NULL UNIQUE,
///     is_super_admin BOOLEAN NOT NULL DEFAULT FALSE,
///     is_email_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Email and username are case-insensitively unique via CITEXT. Credential
/// material (password hashes, tokens) is owned by the external identity
/// layer and never stored here.
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "ada@example.com".to_string(),
///     username: "ada".to_string(),
///     is_super_admin: false,
///     is_email_verified: true,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "ADA@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model representing an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT, unique)
    pub email: String,

    /// Username (case-insensitive via CITEXT, unique)
    pub username: String,

    /// Whether this user bypasses all membership checks
    pub is_super_admin: bool,

    /// Whether the email address has been verified
    ///
    /// Unverified users cannot be added to projects by a project_admin
    pub is_email_verified: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Username
    pub username: String,

    /// Super-admin flag (normally false; set by operators only)
    #[serde(default)]
    pub is_super_admin: bool,

    /// Email verification status
    #[serde(default)]
    pub is_email_verified: bool,
}

/// Input for updating an existing user
///
/// All fields are optional; only non-None fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New email address
    pub email: Option<String>,

    /// New username
    pub username: Option<String>,

    /// Update email verification status
    pub is_email_verified: Option<bool>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns a database error if the email or username is already taken
    /// (unique constraint violation) or the connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, is_super_admin, is_email_verified)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, is_super_admin, is_email_verified,
                      created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.username)
        .bind(data.is_super_admin)
        .bind(data.is_email_verified)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, is_super_admin, is_email_verified,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, is_super_admin, is_email_verified,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates a user's profile fields
    ///
    /// # Returns
    ///
    /// The updated user if found, None otherwise
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                username = COALESCE($3, username),
                is_email_verified = COALESCE($4, is_email_verified),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, username, is_super_admin, is_email_verified,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.email)
        .bind(data.username)
        .bind(data.is_email_verified)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_defaults() {
        let data: CreateUser = serde_json::from_str(
            r#"{"email": "ada@example.com", "username": "ada"}"#,
        )
        .unwrap();
        assert!(!data.is_super_admin);
        assert!(!data.is_email_verified);
    }

    #[test]
    fn test_update_user_default_is_noop() {
        let update = UpdateUser::default();
        assert!(update.email.is_none());
        assert!(update.username.is_none());
        assert!(update.is_email_verified.is_none());
    }
}
