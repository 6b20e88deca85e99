/// UserProfile model and database operations
///
/// One profile row exists per user account, holding notification settings.
/// Profiles are provisioned by `accounts::create_account` in the same
/// transaction as the account; `get_or_create` covers accounts that predate
/// provisioning.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_profiles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
///     email_notifications_enabled BOOLEAN NOT NULL DEFAULT TRUE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Per-user notification settings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    /// Unique profile ID
    pub id: Uuid,

    /// Owning user (one profile per user)
    pub user_id: Uuid,

    /// Whether due-date reminder emails are delivered to this user
    pub email_notifications_enabled: bool,
}

impl UserProfile {
    /// Finds the profile for a user
    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, user_id, email_notifications_enabled
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Gets the profile for a user, creating a default one if missing
    ///
    /// Accounts are normally provisioned with a profile, but a missing row
    /// is tolerated rather than treated as fatal.
    pub async fn get_or_create(pool: &PgPool, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, email_notifications_enabled
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(profile)
    }

    /// Updates the notification preference for a user
    ///
    /// # Returns
    ///
    /// The updated profile if found, None if the user has no profile
    pub async fn set_notifications_enabled(
        pool: &PgPool,
        user_id: Uuid,
        enabled: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles
            SET email_notifications_enabled = $2
            WHERE user_id = $1
            RETURNING id, user_id, email_notifications_enabled
            "#,
        )
        .bind(user_id)
        .bind(enabled)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    // Profile operations require a database; covered in tests/account_tests.rs
}
