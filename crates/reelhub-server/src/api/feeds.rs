use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use reelhub_core::{CategoryFilter, MediaKind};
use reelhub_db::MediaRow;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, required, ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MediaItem {
    file_id: String,
    user_id: String,
    category: String,
    description: String,
    is_public: bool,
    file_name: String,
    file_url: String,
    file_type: String,
    doc_file_url: Option<String>,
    doc_file_name: Option<String>,
    view_count: i64,
    created_at: DateTime<Utc>,
}

impl From<MediaRow> for MediaItem {
    fn from(row: MediaRow) -> Self {
        Self {
            file_id: row.file_id,
            user_id: row.user_id,
            category: row.category,
            description: row.description,
            is_public: row.is_public,
            file_name: row.file_name,
            file_url: row.file_url,
            file_type: row.file_type,
            doc_file_url: row.doc_file_url,
            doc_file_name: row.doc_file_name,
            view_count: row.view_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FeedQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserMediaQuery {
    pub user_id: Option<String>,
    pub category: Option<String>,
}

async fn list_kind(
    state: &AppState,
    req_id: RequestId,
    kind: MediaKind,
    category: Option<&str>,
) -> Result<Json<Vec<MediaItem>>, ApiError> {
    let filter = CategoryFilter::from_query(category);
    let rows = reelhub_db::list_media_by_kind(&state.pool, kind, &filter)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(rows.into_iter().map(MediaItem::from).collect()))
}

/// GET /reels: every video, newest first.
pub(super) async fn list_reels(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<MediaItem>>, ApiError> {
    list_kind(&state, req_id, MediaKind::Video, query.category.as_deref()).await
}

/// GET /memes: every image, newest first.
pub(super) async fn list_memes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<MediaItem>>, ApiError> {
    list_kind(&state, req_id, MediaKind::Image, query.category.as_deref()).await
}

/// GET /getUserMedia: one user's uploads of either kind.
pub(super) async fn list_user_media(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<UserMediaQuery>,
) -> Result<Json<Vec<MediaItem>>, ApiError> {
    let user_id = required(&req_id.0, "userId", query.user_id.as_deref())?;
    let filter = CategoryFilter::from_query(query.category.as_deref());

    let rows = reelhub_db::list_user_media(&state.pool, &user_id, &filter)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(rows.into_iter().map(MediaItem::from).collect()))
}
