mod auth;
mod feeds;
mod form;
mod profiles;
mod streaks;
mod uploads;
mod views;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use reelhub_core::AppConfig;
use reelhub_media::MediaStore;
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub media: MediaStore,
    pub view_batch_size: usize,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pool: PgPool, media: MediaStore, config: &AppConfig) -> Self {
        Self {
            pool,
            media,
            view_batch_size: config.view_batch_size,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Error body shared by every route: a flat `{code, message, requestId}` object.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub request_id: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            request_id: request_id.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            // Duplicate and self-referencing writes are reported as bad requests.
            "validation_error" | "conflict" => StatusCode::BAD_REQUEST,
            "payload_too_large" => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Trimmed value of a required input, or a `validation_error` naming it.
pub(super) fn required(
    request_id: &str,
    field: &str,
    value: Option<&str>,
) -> Result<String, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| ApiError::new(request_id, "validation_error", format!("{field} is required")))
}

/// Unwrap a JSON body, reporting malformed or mistyped input as a `validation_error`.
pub(super) fn json_body<T>(
    request_id: &str,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        let code = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            "payload_too_large"
        } else {
            "validation_error"
        };
        tracing::debug!(error = %rejection.body_text(), "request body rejected");
        ApiError::new(request_id, code, rejection.body_text())
    })
}

pub(super) fn map_db_error(request_id: String, error: &reelhub_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn map_media_error(request_id: String, error: &reelhub_media::MediaError) -> ApiError {
    tracing::error!(error = %error, "object store request failed");
    ApiError::new(request_id, "internal_error", "media storage failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/register", post(auth::register))
        .route("/signin", post(auth::signin))
        .route("/upload", post(uploads::upload_media))
        .route("/profile-send", post(uploads::save_profile))
        .route("/reels", get(feeds::list_reels))
        .route("/memes", get(feeds::list_memes))
        .route("/getUserMedia", get(feeds::list_user_media))
        .route("/profileget", get(profiles::get_profile))
        .route("/search-users", get(profiles::search_users))
        .route("/increment-views", post(views::increment_views))
        .route("/add-streak", post(streaks::add_streak))
        .route("/check-streak", get(streaks::check_streak))
        .route("/get-streak-count", get(streaks::get_streak_count))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match reelhub_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}
