//! Streak endpoints: one endorsement per watcher per profile.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use reelhub_core::{validate_grant, CoreError, GrantOutcome, StreakStatus};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{json_body, map_db_error, required, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StreakRequest {
    pub profile_user_id: Option<String>,
    pub watch_user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StreakCountQuery {
    pub profile_user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct StreakCount {
    count: i64,
}

fn map_grant_error(req_id: &str, e: &CoreError) -> ApiError {
    match e {
        CoreError::SelfEndorsement => ApiError::new(req_id, "conflict", e.to_string()),
        _ => ApiError::new(req_id, "validation_error", e.to_string()),
    }
}

/// POST /add-streak
pub(super) async fn add_streak(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<StreakRequest>, JsonRejection>,
) -> Result<Json<GrantOutcome>, ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, payload)?;
    let (subject, endorser) = validate_grant(
        body.profile_user_id.as_deref().unwrap_or_default(),
        body.watch_user_id.as_deref().unwrap_or_default(),
    )
    .map_err(|e| map_grant_error(rid, &e))?;

    let outcome = reelhub_db::grant_streak(&state.pool, subject, endorser)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    if !outcome.granted {
        return Err(ApiError::new(
            rid,
            "conflict",
            "streak already granted for this profile",
        ));
    }

    tracing::info!(subject = %subject, count = outcome.count, "streak granted");
    Ok(Json(outcome))
}

/// GET /check-streak
pub(super) async fn check_streak(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<StreakRequest>,
) -> Result<Json<StreakStatus>, ApiError> {
    let subject = required(&req_id.0, "profileUserId", query.profile_user_id.as_deref())?;
    let endorser = required(&req_id.0, "watchUserId", query.watch_user_id.as_deref())?;

    let status = reelhub_db::streak_status(&state.pool, &subject, &endorser)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(status))
}

/// GET /get-streak-count
pub(super) async fn get_streak_count(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<StreakCountQuery>,
) -> Result<Json<StreakCount>, ApiError> {
    let subject = required(&req_id.0, "profileUserId", query.profile_user_id.as_deref())?;

    let count = reelhub_db::streak_count(&state.pool, &subject)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(StreakCount { count }))
}
