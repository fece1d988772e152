//! Multipart form collection shared by the upload handlers.

use std::collections::HashMap;

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};
use reelhub_media::Upload;

use super::ApiError;

/// Text fields and file parts of a multipart body, keyed by field name.
#[derive(Debug, Default)]
pub(super) struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl UploadForm {
    /// Drain the multipart stream. A part with a file name is kept as a file;
    /// anything else is read as text. Browsers send an empty part for an
    /// unselected file input, which is skipped.
    pub(super) async fn read(request_id: &str, mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(request_id, &e))?
        {
            let Some(name) = field.name().map(ToOwned::to_owned) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(ToOwned::to_owned) {
                let content_type = field.content_type().unwrap_or_default().to_owned();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(request_id, &e))?;
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                form.files.insert(
                    name,
                    Upload {
                        file_name,
                        content_type,
                        data,
                    },
                );
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(request_id, &e))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    pub(super) fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub(super) fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }
}

fn multipart_error(request_id: &str, error: &MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::new(
            request_id,
            "payload_too_large",
            "upload exceeds the configured size limit",
        );
    }
    ApiError::new(
        request_id,
        "validation_error",
        format!("invalid multipart body: {}", error.body_text()),
    )
}
