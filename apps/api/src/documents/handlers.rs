//! Axum route handlers for document upload and download.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use resumecraft_profile::models::{DownloadFormat, DownloadRequest};

use crate::documents::{latest_resume, render};
use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::RESUMES_DIR;

/// POST /api/resume/upload
///
/// Stores the multipart field `file` as `res{ext}` in the resumes directory.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original = field.file_name().unwrap_or_default().to_string();
        if original.is_empty() {
            return Err(AppError::Validation("No selected file".to_string()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let filename = state.store.save_upload(&original, &bytes).await?;
        info!("Uploaded '{original}' ({} bytes) as {filename}", bytes.len());
        return Ok(Json(json!({
            "message": "Resume uploaded and saved as 'res' successfully",
            "filename": filename,
            "path": format!("{RESUMES_DIR}/{filename}")
        })));
    }

    Err(AppError::Validation("No file part".to_string()))
}

/// POST /api/document/download
///
/// Empty content means "the latest stored resume". Text starting with a
/// salutation is laid out as a cover letter, anything else as a resume.
pub async fn handle_download(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> Result<Response, AppError> {
    let format: DownloadFormat = request.format.parse().map_err(AppError::Validation)?;

    let profile = state.store.profile().await;
    let content = if request.content.trim().is_empty() {
        latest_resume(&profile)
            .map(str::to_string)
            .ok_or_else(|| AppError::NotFound("No resume found".to_string()))?
    } else {
        request.content
    };

    let file_name = format!(
        "{}.{}",
        request.file_name.replace(['"', '/', '\\'], ""),
        format.extension()
    );
    let bytes = render::render(&profile, &content, &request.file_name, format)?;
    info!("Rendered {file_name} ({} bytes)", bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
