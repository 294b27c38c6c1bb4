//! Stateless extraction and save API routes

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::auth::CurrentUser;
use crate::application::dto::{ExtractRequestDto, ExtractResponseDto, SaveRequestDto};
use crate::application::services::{ExtractionError, SaveError, SaveOptions, SaveResult};
use crate::domain::value_objects::StoryId;
use crate::infrastructure::state::AppState;

pub(super) fn extraction_error(err: ExtractionError) -> (StatusCode, String) {
    let status = match &err {
        ExtractionError::EmptyContent | ExtractionError::NoTemplatesSelected => {
            StatusCode::BAD_REQUEST
        }
        ExtractionError::ExtractionInProgress => StatusCode::CONFLICT,
    };
    (status, err.to_string())
}

pub(super) fn save_error(err: SaveError) -> (StatusCode, String) {
    match &err {
        SaveError::NotAuthenticated => (StatusCode::UNAUTHORIZED, err.to_string()),
    }
}

/// Blank means "no explicit story"
pub(super) fn parse_story_id(raw: Option<&str>) -> Result<Option<StoryId>, (StatusCode, String)> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => StoryId::parse(value)
            .map(Some)
            .ok_or_else(|| (StatusCode::BAD_REQUEST, "Invalid story ID".to_string())),
    }
}

/// Run the mock extraction over the given content and templates
pub async fn extract(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequestDto>,
) -> Result<Json<ExtractResponseDto>, (StatusCode, String)> {
    let items = state
        .extraction_service
        .extract(&req.content, &req.templates)
        .await
        .map_err(extraction_error)?;
    Ok(Json(items.into()))
}

/// Persist an explicit list of extracted items for the current user
pub async fn save_items(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<SaveRequestDto>,
) -> Result<Json<SaveResult>, (StatusCode, String)> {
    let options = SaveOptions {
        story_id: parse_story_id(req.story_id.as_deref())?,
    };
    state
        .persistence_service
        .save_items(user_id, &req.items, options)
        .await
        .map(Json)
        .map_err(save_error)
}
