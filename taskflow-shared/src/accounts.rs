/// Account provisioning and settings
///
/// Every user account carries exactly one settings profile. This module is
/// the only place accounts are created: [`create_account`] validates the
/// registration input, hashes the password, and inserts the user row and
/// its default profile row inside a single transaction, so an account can
/// never exist without its profile.
///
/// Later writes keep the pair in step: [`save_account`] persists a user and
/// its profile in tandem, and [`update_settings`] applies the settings
/// shape the external API exposes (username, email, notification
/// preference), creating the profile on the fly if an account somehow lost
/// it.
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::accounts::{create_account, NewAccount};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let (user, profile) = create_account(&pool, NewAccount {
///     username: "ada".to_string(),
///     email: "ada@example.com".to_string(),
///     password: "Str0ng!Pass".to_string(),
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
/// }).await?;
///
/// assert!(profile.email_notifications_enabled);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, PasswordError};
use crate::models::profile::UserProfile;
use crate::models::user::{UpdateUser, User};

/// Account operation error type
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Registration input failed field validation
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Password does not meet strength requirements
    #[error("Weak password: {0}")]
    WeakPassword(String),

    /// Password hashing failed
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    /// Account does not exist
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Registration input for a new account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAccount {
    /// Login name
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password (validated for strength, then hashed)
    pub password: String,

    /// Optional given name
    #[serde(default)]
    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    pub first_name: String,

    /// Optional family name
    #[serde(default)]
    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    pub last_name: String,
}

/// Settings shape exposed to the external API layer
///
/// All fields are optional; only provided fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    /// New login name
    pub username: Option<String>,

    /// New email address
    pub email: Option<String>,

    /// New notification preference
    pub email_notifications_enabled: Option<bool>,
}

/// Creates a user account with its default settings profile
///
/// The user row and the profile row are inserted in one transaction:
/// either both exist afterwards or neither does.
///
/// # Errors
///
/// - [`AccountError::Validation`] / [`AccountError::WeakPassword`] on bad
///   input
/// - [`AccountError::Database`] on insert failure (including a taken
///   username)
pub async fn create_account(
    pool: &PgPool,
    data: NewAccount,
) -> Result<(User, UserProfile), AccountError> {
    data.validate()?;
    validate_password_strength(&data.password).map_err(AccountError::WeakPassword)?;

    let password_hash = hash_password(&data.password)?;

    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash, first_name, last_name)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, email, password_hash, first_name, last_name,
                  created_at, updated_at
        "#,
    )
    .bind(&data.username)
    .bind(&data.email)
    .bind(&password_hash)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .fetch_one(&mut *tx)
    .await?;

    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles (user_id)
        VALUES ($1)
        RETURNING id, user_id, email_notifications_enabled
        "#,
    )
    .bind(user.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(user_id = %user.id, username = %user.username, "Account created");

    Ok((user, profile))
}

/// Persists a user row and its profile row in tandem
///
/// Both writes happen in one transaction so profile mutations made through
/// the account object are flushed together with the account itself.
///
/// # Errors
///
/// Returns an error on database failure
pub async fn save_account(
    pool: &PgPool,
    user: &User,
    profile: &UserProfile,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE users
        SET username = $2,
            email = $3,
            password_hash = $4,
            first_name = $5,
            last_name = $6,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE user_profiles
        SET email_notifications_enabled = $2
        WHERE user_id = $1
        "#,
    )
    .bind(profile.user_id)
    .bind(profile.email_notifications_enabled)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}

/// Applies a settings update to an account
///
/// Updates the user's username/email and the profile's notification
/// preference. A missing profile is created with defaults rather than
/// treated as an error.
///
/// # Returns
///
/// The updated user and profile
///
/// # Errors
///
/// - [`AccountError::NotFound`] if the user does not exist
/// - [`AccountError::Database`] on write failure
pub async fn update_settings(
    pool: &PgPool,
    user_id: Uuid,
    update: SettingsUpdate,
) -> Result<(User, UserProfile), AccountError> {
    let user = User::update(
        pool,
        user_id,
        UpdateUser {
            username: update.username,
            email: update.email,
            ..Default::default()
        },
    )
    .await?
    .ok_or(AccountError::NotFound(user_id))?;

    // Accounts are provisioned with a profile, but tolerate a missing row
    let mut profile = UserProfile::get_or_create(pool, user_id).await?;

    if let Some(enabled) = update.email_notifications_enabled {
        if let Some(updated) = UserProfile::set_notifications_enabled(pool, user_id, enabled).await? {
            profile = updated;
        }
    }

    Ok((user, profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_account() -> NewAccount {
        NewAccount {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    #[test]
    fn test_new_account_valid() {
        assert!(valid_account().validate().is_ok());
    }

    #[test]
    fn test_new_account_rejects_bad_email() {
        let mut account = valid_account();
        account.email = "not-an-email".to_string();

        let errors = account.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_new_account_rejects_empty_username() {
        let mut account = valid_account();
        account.username = String::new();

        let errors = account.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_settings_update_default_is_noop() {
        let update = SettingsUpdate::default();
        assert!(update.username.is_none());
        assert!(update.email.is_none());
        assert!(update.email_notifications_enabled.is_none());
    }

    // Provisioning invariants (one profile per account, transactional
    // create) are covered in tests/account_tests.rs
}
