//! Database operations for the `users` table.

use chrono::{DateTime, Utc};
use reelhub_core::PasswordDigest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{violated_unique_constraint, DbError};

/// Fresh ids are tried this many times before a primary-key collision is
/// reported as an error.
const MAX_ID_ATTEMPTS: u32 = 3;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub username: String,
    pub email: Option<String>,
    pub password_digest: String,
    pub password_salt: String,
    pub registered_at: DateTime<Utc>,
}

impl UserRow {
    /// Check a sign-in password against the stored digest.
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        PasswordDigest::verify(&self.password_salt, &self.password_digest, candidate)
    }
}

/// A username search hit, joined with the user's profile photo when present.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSearchRow {
    pub user_id: String,
    pub username: String,
    pub profile_photo_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Registers a new user with a random UUID id.
///
/// # Errors
///
/// Returns [`DbError::UsernameTaken`] or [`DbError::EmailTaken`] when the
/// matching unique constraint rejects the insert, or [`DbError::Sqlx`] for any
/// other failure (including repeated id collisions).
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: Option<&str>,
    password: &PasswordDigest,
) -> Result<UserRow, DbError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let user_id = Uuid::new_v4().to_string();

        let result = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (user_id, username, email, password_digest, password_salt) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING user_id, username, email, password_digest, password_salt, registered_at",
        )
        .bind(&user_id)
        .bind(username)
        .bind(email)
        .bind(&password.digest)
        .bind(&password.salt)
        .fetch_one(pool)
        .await;

        match result {
            Ok(row) => return Ok(row),
            Err(e) => match violated_unique_constraint(&e).map(str::to_owned).as_deref() {
                Some("users_pkey") if attempt < MAX_ID_ATTEMPTS => {}
                Some("users_username_key") => return Err(DbError::UsernameTaken),
                Some("users_email_key") => return Err(DbError::EmailTaken),
                _ => return Err(DbError::Sqlx(e)),
            },
        }
    }
}

/// Finds a user by username or email. An exact username match wins over an
/// email match when both exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_user_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT user_id, username, email, password_digest, password_salt, registered_at \
         FROM users \
         WHERE username = $1 OR email = $1 \
         ORDER BY (username = $1) DESC \
         LIMIT 1",
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Case-insensitive substring search over usernames.
///
/// Uses `strpos` rather than `ILIKE` so `%` and `_` in the term match literally.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_users(pool: &PgPool, term: &str) -> Result<Vec<UserSearchRow>, DbError> {
    let rows = sqlx::query_as::<_, UserSearchRow>(
        "SELECT u.user_id, u.username, p.profile_photo_url \
         FROM users u \
         LEFT JOIN profiles p ON p.user_id = u.user_id \
         WHERE strpos(lower(u.username), lower($1)) > 0 \
         ORDER BY lower(u.username), u.username",
    )
    .bind(term)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
