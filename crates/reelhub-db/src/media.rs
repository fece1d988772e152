//! Database operations for the `media` table (uploaded content metadata).

use chrono::{DateTime, Utc};
use reelhub_core::{CategoryFilter, MediaKind};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `media` table. `view_count` reads a missing counter as zero.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MediaRow {
    pub file_id: String,
    pub user_id: String,
    pub category: String,
    pub description: String,
    pub is_public: bool,
    pub file_name: String,
    pub file_url: String,
    pub file_type: String,
    pub doc_file_url: Option<String>,
    pub doc_file_name: Option<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Metadata for a freshly uploaded asset.
#[derive(Debug, Clone, Copy)]
pub struct NewMedia<'a> {
    pub file_id: &'a str,
    pub user_id: &'a str,
    pub category: &'a str,
    pub description: &'a str,
    pub is_public: bool,
    pub file_name: &'a str,
    pub file_url: &'a str,
    pub kind: MediaKind,
    pub doc_file_url: Option<&'a str>,
    pub doc_file_name: Option<&'a str>,
}

const MEDIA_COLUMNS: &str = "file_id, user_id, category, description, is_public, file_name, \
     file_url, file_type, doc_file_url, doc_file_name, \
     COALESCE(view_count, 0) AS view_count, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a content record with a zero view count.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_media(pool: &PgPool, media: NewMedia<'_>) -> Result<MediaRow, DbError> {
    let sql = format!(
        "INSERT INTO media (file_id, user_id, category, description, is_public, file_name, \
                            file_url, file_type, doc_file_url, doc_file_name, view_count) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0) \
         RETURNING {MEDIA_COLUMNS}"
    );

    let row = sqlx::query_as::<_, MediaRow>(&sql)
        .bind(media.file_id)
        .bind(media.user_id)
        .bind(media.category)
        .bind(media.description)
        .bind(media.is_public)
        .bind(media.file_name)
        .bind(media.file_url)
        .bind(media.kind.as_str())
        .bind(media.doc_file_url)
        .bind(media.doc_file_name)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

/// Returns a single content record by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_media(pool: &PgPool, file_id: &str) -> Result<Option<MediaRow>, DbError> {
    let sql = format!("SELECT {MEDIA_COLUMNS} FROM media WHERE file_id = $1");
    let row = sqlx::query_as::<_, MediaRow>(&sql)
        .bind(file_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Returns every content record of one kind, newest first, optionally
/// restricted to an exact category.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_media_by_kind(
    pool: &PgPool,
    kind: MediaKind,
    category: &CategoryFilter,
) -> Result<Vec<MediaRow>, DbError> {
    let sql = format!(
        "SELECT {MEDIA_COLUMNS} FROM media \
         WHERE file_type = $1 AND ($2::text IS NULL OR category = $2) \
         ORDER BY created_at DESC, file_id"
    );
    let rows = sqlx::query_as::<_, MediaRow>(&sql)
        .bind(kind.as_str())
        .bind(category.as_exact())
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Returns every content record owned by `user_id`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_user_media(
    pool: &PgPool,
    user_id: &str,
    category: &CategoryFilter,
) -> Result<Vec<MediaRow>, DbError> {
    let sql = format!(
        "SELECT {MEDIA_COLUMNS} FROM media \
         WHERE user_id = $1 AND ($2::text IS NULL OR category = $2) \
         ORDER BY created_at DESC, file_id"
    );
    let rows = sqlx::query_as::<_, MediaRow>(&sql)
        .bind(user_id)
        .bind(category.as_exact())
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Atomically adds one view to a content record and returns the new count.
/// A missing counter is treated as zero.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no record has this id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn increment_view_count(pool: &PgPool, file_id: &str) -> Result<i64, DbError> {
    sqlx::query_scalar::<_, i64>(
        "UPDATE media \
         SET view_count = COALESCE(view_count, 0) + 1 \
         WHERE file_id = $1 \
         RETURNING view_count",
    )
    .bind(file_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}
