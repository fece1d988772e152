//! Database operations for the `profiles` table.

use chrono::{DateTime, Utc};
use reelhub_core::SocialLink;
use sqlx::{types::Json, PgPool};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub user_id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub profile_photo_url: Option<String>,
    pub social_links: Json<Vec<SocialLink>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A profile joined with the owning user's registration time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileDetailRow {
    #[sqlx(flatten)]
    pub profile: ProfileRow,
    pub registered_at: Option<DateTime<Utc>>,
}

impl ProfileDetailRow {
    /// When the account began: registration time, or profile creation when
    /// no user row exists.
    #[must_use]
    pub fn member_since(&self) -> DateTime<Utc> {
        self.registered_at.unwrap_or(self.profile.created_at)
    }
}

/// Fields written by a profile update.
///
/// `profile_photo_url` and `social_links` keep their stored values when `None`.
#[derive(Debug, Clone, Copy)]
pub struct ProfileUpdate<'a> {
    pub user_id: &'a str,
    pub username: &'a str,
    pub name: &'a str,
    pub bio: &'a str,
    pub profile_photo_url: Option<&'a str>,
    pub social_links: Option<&'a [SocialLink]>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Creates or replaces a user's profile and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_profile(
    pool: &PgPool,
    update: ProfileUpdate<'_>,
) -> Result<ProfileRow, DbError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "INSERT INTO profiles (user_id, username, name, bio, profile_photo_url, social_links) \
         VALUES ($1, $2, $3, $4, $5, COALESCE($6, '[]'::jsonb)) \
         ON CONFLICT (user_id) DO UPDATE SET \
             username = EXCLUDED.username, \
             name = EXCLUDED.name, \
             bio = EXCLUDED.bio, \
             profile_photo_url = COALESCE($5, profiles.profile_photo_url), \
             social_links = COALESCE($6, profiles.social_links), \
             updated_at = NOW() \
         RETURNING user_id, username, name, bio, profile_photo_url, social_links, \
                   created_at, updated_at",
    )
    .bind(update.user_id)
    .bind(update.username)
    .bind(update.name)
    .bind(update.bio)
    .bind(update.profile_photo_url)
    .bind(update.social_links.map(Json))
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns a profile with its owner's registration time, or `None` if the
/// user has never saved a profile.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_profile(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<ProfileDetailRow>, DbError> {
    let row = sqlx::query_as::<_, ProfileDetailRow>(
        "SELECT p.user_id, p.username, p.name, p.bio, p.profile_photo_url, p.social_links, \
                p.created_at, p.updated_at, u.registered_at \
         FROM profiles p \
         LEFT JOIN users u ON u.user_id = p.user_id \
         WHERE p.user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
