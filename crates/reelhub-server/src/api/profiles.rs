use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use reelhub_core::{account_age_days, SocialLink};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, required, ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProfileItem {
    name: String,
    bio: String,
    profile_pic: Option<String>,
    username: String,
    social_links: Vec<SocialLink>,
    account_age_days: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserSearchItem {
    user_id: String,
    username: String,
    profile_pic: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProfileQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub username: Option<String>,
}

/// GET /profileget
pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ProfileItem>, ApiError> {
    let user_id = required(&req_id.0, "userId", query.user_id.as_deref())?;

    let detail = reelhub_db::get_profile(&state.pool, &user_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("profile for user '{user_id}' not found"),
            )
        })?;

    let account_age_days = account_age_days(detail.member_since(), Utc::now());
    let profile = detail.profile;

    Ok(Json(ProfileItem {
        name: profile.name,
        bio: profile.bio,
        profile_pic: profile.profile_photo_url,
        username: profile.username,
        social_links: profile.social_links.0,
        account_age_days,
    }))
}

/// GET /search-users: case-insensitive substring match on usernames.
pub(super) async fn search_users(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserSearchItem>>, ApiError> {
    let term = required(&req_id.0, "username", query.username.as_deref())?;

    let rows = reelhub_db::search_users(&state.pool, &term)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let users = rows
        .into_iter()
        .map(|row| UserSearchItem {
            user_id: row.user_id,
            username: row.username,
            profile_pic: row.profile_photo_url,
        })
        .collect();

    Ok(Json(users))
}
