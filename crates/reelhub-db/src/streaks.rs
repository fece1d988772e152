//! Database operations for the `streaks` ledger.
//!
//! Grants are a single conditional upsert, so concurrent grants for the same
//! subject serialize on the row and no endorser is lost.

use chrono::{DateTime, Utc};
use reelhub_core::{EndorsementSet, GrantOutcome, StreakStatus};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `streaks` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StreakRow {
    pub subject_id: String,
    pub endorser_ids: Vec<String>,
    pub count: i32,
    pub updated_at: DateTime<Utc>,
}

impl StreakRow {
    #[must_use]
    pub fn endorsements(&self) -> EndorsementSet {
        EndorsementSet::from(self.endorser_ids.clone())
    }
}

/// Returns the ledger row for `subject_id`, if anyone has granted it a streak.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_streak(pool: &PgPool, subject_id: &str) -> Result<Option<StreakRow>, DbError> {
    let row = sqlx::query_as::<_, StreakRow>(
        "SELECT subject_id, endorser_ids, count, updated_at \
         FROM streaks \
         WHERE subject_id = $1",
    )
    .bind(subject_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Records a streak from `endorser_id` to `subject_id`.
///
/// Creates the ledger row on first grant. A repeated grant leaves the row
/// untouched and returns `granted: false` with the current count. Callers
/// validate ids and reject self-grants first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn grant_streak(
    pool: &PgPool,
    subject_id: &str,
    endorser_id: &str,
) -> Result<GrantOutcome, DbError> {
    let granted_count = sqlx::query_scalar::<_, i32>(
        "INSERT INTO streaks (subject_id, endorser_ids, count, updated_at) \
         VALUES ($1, ARRAY[$2::text], 1, NOW()) \
         ON CONFLICT (subject_id) DO UPDATE SET \
             endorser_ids = array_append(streaks.endorser_ids, $2::text), \
             count = streaks.count + 1, \
             updated_at = NOW() \
         WHERE NOT ($2::text = ANY(streaks.endorser_ids)) \
         RETURNING count",
    )
    .bind(subject_id)
    .bind(endorser_id)
    .fetch_optional(pool)
    .await?;

    if let Some(count) = granted_count {
        return Ok(GrantOutcome {
            count: i64::from(count),
            granted: true,
        });
    }

    // The guard skipped the update: this endorser is already on the ledger.
    let count = streak_count(pool, subject_id).await?;
    Ok(GrantOutcome {
        count,
        granted: false,
    })
}

/// Returns the subject's streak count and whether `endorser_id` has granted.
/// A subject with no ledger row reports zero and `false`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn streak_status(
    pool: &PgPool,
    subject_id: &str,
    endorser_id: &str,
) -> Result<StreakStatus, DbError> {
    let endorsements = get_streak(pool, subject_id)
        .await?
        .map(|row| row.endorsements())
        .unwrap_or_default();

    Ok(endorsements.status(endorser_id))
}

/// Returns the number of distinct endorsers of `subject_id`, zero if none.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn streak_count(pool: &PgPool, subject_id: &str) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i32>("SELECT count FROM streaks WHERE subject_id = $1")
        .bind(subject_id)
        .fetch_optional(pool)
        .await?;

    Ok(count.map_or(0, i64::from))
}
