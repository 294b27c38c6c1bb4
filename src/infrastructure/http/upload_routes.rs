//! File upload API routes

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use super::auth::CurrentUser;
use super::extraction_routes::parse_story_id;
use crate::application::services::{UploadError, UploadOutcome, UploadRequest};
use crate::infrastructure::state::AppState;

fn upload_error(err: UploadError) -> (StatusCode, String) {
    let status = match &err {
        UploadError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        UploadError::UnsupportedFileType(_) | UploadError::InvalidFileName(_) => {
            StatusCode::BAD_REQUEST
        }
        UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        UploadError::FileNotFound(_) | UploadError::StoryNotFound(_) => StatusCode::NOT_FOUND,
        UploadError::Storage(_)
        | UploadError::Processing(_)
        | UploadError::StoryCreation(_)
        | UploadError::ChapterCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

/// Store a document and file its text as chapter 1 of a story
///
/// Multipart fields: `file` (required), `chapter_title` and `story_id`.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UploadOutcome>, (StatusCode, String)> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut chapter_title = None;
    let mut story_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (e.status(), e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(|name| name.to_string())
                    .ok_or_else(|| (StatusCode::BAD_REQUEST, "File name is required".to_string()))?;
                let bytes = field.bytes().await.map_err(|e| (e.status(), e.body_text()))?;
                file = Some((file_name, bytes.to_vec()));
            }
            Some("chapter_title") => {
                chapter_title = Some(field.text().await.map_err(|e| (e.status(), e.body_text()))?);
            }
            Some("story_id") => {
                let raw = field.text().await.map_err(|e| (e.status(), e.body_text()))?;
                story_id = parse_story_id(Some(&raw))?;
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| (StatusCode::BAD_REQUEST, "No file provided".to_string()))?;

    state
        .upload_service
        .upload_and_process(
            user_id,
            UploadRequest {
                file_name,
                bytes,
                chapter_title,
                story_id,
            },
        )
        .await
        .map(Json)
        .map_err(upload_error)
}

/// Remove one of the caller's stored files
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(file_name): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .upload_service
        .delete_file(user_id, &file_name)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(upload_error)
}
