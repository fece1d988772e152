use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use reelhub_core::{increment_many, IncrementSummary};
use reelhub_db::DbError;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{json_body, ApiError, AppState};

/// Pull `videoIds` out of the request body. It must be an array of strings.
fn parse_video_ids(req_id: &str, body: &Value) -> Result<Vec<String>, ApiError> {
    let invalid = || ApiError::new(req_id, "validation_error", "videoIds must be an array of ids");

    body.get("videoIds")
        .and_then(Value::as_array)
        .ok_or_else(invalid)?
        .iter()
        .map(|id| id.as_str().map(ToOwned::to_owned).ok_or_else(invalid))
        .collect()
}

/// POST /increment-views: add one view to each id, reporting per-id outcomes.
pub(super) async fn increment_views(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IncrementSummary>, ApiError> {
    let body = json_body(&req_id.0, payload)?;
    let ids = parse_video_ids(&req_id.0, &body)?;

    let pool = &state.pool;
    let summary = increment_many(ids, state.view_batch_size, |id| async move {
        match reelhub_db::increment_view_count(pool, &id).await {
            Ok(_) => Ok(()),
            Err(DbError::NotFound) => Err("record not found"),
            Err(e) => {
                tracing::error!(file_id = %id, error = %e, "view count update failed");
                Err("view count update failed")
            }
        }
    })
    .await;

    tracing::info!(
        succeeded = summary.success_count,
        failed = summary.failed_count,
        "view counts incremented"
    );

    Ok(Json(summary))
}
