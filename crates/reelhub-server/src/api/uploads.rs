//! Multipart handlers: content uploads and profile saves.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use reelhub_core::{parse_social_links, parse_visibility, MediaKind};
use reelhub_db::{NewMedia, ProfileUpdate};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{
    form::UploadForm, map_db_error, map_media_error, required, ApiError, AppState,
};

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UploadResponse {
    file_id: String,
    file_url: String,
    file_type: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc_file_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveProfileResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_photo_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /upload: store a file (and optional companion document) and record it.
pub(super) async fn upload_media(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let rid = &req_id.0;
    let mut form = UploadForm::read(rid, multipart).await?;

    let user_id = required(rid, "userId", form.text("userId"))?;
    let file = form
        .take_file("file")
        .ok_or_else(|| ApiError::new(rid, "validation_error", "file is required"))?;
    let docfile = form.take_file("docfile");

    let file_id = Uuid::new_v4().to_string();
    let kind = MediaKind::from_content_type(&file.content_type);
    let stored = state
        .media
        .put(&file_id, &file)
        .await
        .map_err(|e| map_media_error(rid.clone(), &e))?;

    let stored_doc = match &docfile {
        Some(doc) => Some(
            state
                .media
                .put(&Uuid::new_v4().to_string(), doc)
                .await
                .map_err(|e| map_media_error(rid.clone(), &e))?,
        ),
        None => None,
    };

    let row = reelhub_db::insert_media(
        &state.pool,
        NewMedia {
            file_id: &file_id,
            user_id: &user_id,
            category: form.text("category").unwrap_or_default(),
            description: form.text("description").unwrap_or_default(),
            is_public: parse_visibility(form.text("isPublic")),
            file_name: &file.file_name,
            file_url: &stored.url,
            kind,
            doc_file_url: stored_doc.as_ref().map(|d| d.url.as_str()),
            doc_file_name: docfile.as_ref().map(|d| d.file_name.as_str()),
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(
        file_id = %row.file_id,
        user_id = %row.user_id,
        file_type = %kind,
        "media uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            file_id: row.file_id,
            file_url: row.file_url,
            file_type: kind,
            doc_file_url: row.doc_file_url,
        }),
    ))
}

/// POST /profile-send: create or update a profile, optionally with a photo.
pub(super) async fn save_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    multipart: Multipart,
) -> Result<Json<SaveProfileResponse>, ApiError> {
    let rid = &req_id.0;
    let mut form = UploadForm::read(rid, multipart).await?;

    let user_id = required(rid, "userId", form.text("userId"))?;

    let social_links = match form.text("socialLinks").map(str::trim) {
        Some(raw) if !raw.is_empty() => match parse_social_links(raw) {
            Ok(links) => Some(links),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "ignoring social links");
                None
            }
        },
        _ => None,
    };

    let photo_url = match form.take_file("file") {
        Some(photo) => Some(
            state
                .media
                .put(&Uuid::new_v4().to_string(), &photo)
                .await
                .map_err(|e| map_media_error(rid.clone(), &e))?
                .url,
        ),
        None => None,
    };

    reelhub_db::upsert_profile(
        &state.pool,
        ProfileUpdate {
            user_id: &user_id,
            username: form.text("username").unwrap_or_default(),
            name: form.text("name").unwrap_or_default(),
            bio: form.text("bio").unwrap_or_default(),
            profile_photo_url: photo_url.as_deref(),
            social_links: social_links.as_deref(),
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(SaveProfileResponse {
        message: "profile saved",
        profile_photo_url: photo_url,
    }))
}
