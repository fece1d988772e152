//! Account registration and sign-in.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use reelhub_core::PasswordDigest;
use reelhub_db::DbError;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{json_body, map_db_error, required, ApiError, AppState};

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SigninRequest {
    #[serde(alias = "username")]
    pub identifier: Option<String>,
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RegisterResponse {
    user_id: String,
    username: String,
    registered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SigninResponse {
    user_id: String,
    username: String,
    email: Option<String>,
}

fn map_register_error(req_id: &str, e: &DbError) -> ApiError {
    match e {
        DbError::UsernameTaken => ApiError::new(req_id, "conflict", "username already taken"),
        DbError::EmailTaken => ApiError::new(req_id, "conflict", "email already registered"),
        other => map_db_error(req_id.to_owned(), other),
    }
}

/// Passwords are checked as sent; only a wholly empty one is rejected.
fn required_password(req_id: &str, password: Option<String>) -> Result<String, ApiError> {
    password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::new(req_id, "validation_error", "password is required"))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /register
pub(super) async fn register(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, payload)?;

    let username = required(rid, "username", body.username.as_deref())?;
    let password = required_password(rid, body.password)?;
    let email = body
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    let digest = PasswordDigest::new(&password);
    let user = reelhub_db::create_user(&state.pool, &username, email, &digest)
        .await
        .map_err(|e| map_register_error(rid, &e))?;

    tracing::info!(user_id = %user.user_id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.user_id,
            username: user.username,
            registered_at: user.registered_at,
        }),
    ))
}

/// POST /signin: `identifier` may be a username or an email address.
pub(super) async fn signin(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<SigninResponse>, ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, payload)?;

    let identifier = required(rid, "identifier", body.identifier.as_deref())?;
    let password = required_password(rid, body.password)?;

    let user = reelhub_db::find_user_by_identifier(&state.pool, &identifier)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "user not found"))?;

    if !user.password_matches(&password) {
        tracing::debug!(user_id = %user.user_id, "sign-in rejected");
        return Err(ApiError::new(rid, "unauthorized", "invalid credentials"));
    }

    Ok(Json(SigninResponse {
        user_id: user.user_id,
        username: user.username,
        email: user.email,
    }))
}
