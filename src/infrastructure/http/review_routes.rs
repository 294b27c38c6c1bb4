//! Review session API routes
//!
//! A review session walks the input, extracting and review steps, holds
//! the extracted items while they are edited, and approves or exports them.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use super::auth::CurrentUser;
use super::extraction_routes::{extraction_error, parse_story_id, save_error};
use crate::application::dto::{
    ApproveQueryDto, EditFieldRequestDto, ReviewSessionDto, UpdateInputRequestDto,
};
use crate::application::services::{ApprovalOutcome, ReviewError, SaveOptions};
use crate::domain::entities::FieldEditError;
use crate::domain::value_objects::ReviewSessionId;
use crate::infrastructure::export::JsonExporter;
use crate::infrastructure::state::AppState;

fn review_error(err: ReviewError) -> (StatusCode, String) {
    match err {
        ReviewError::Extraction(inner) => extraction_error(inner),
        ReviewError::Save(inner) => save_error(inner),
        other => (review_status(&other), other.to_string()),
    }
}

fn review_status(err: &ReviewError) -> StatusCode {
    match err {
        ReviewError::SessionNotFound(_) | ReviewError::ItemNotFound(_) => StatusCode::NOT_FOUND,
        ReviewError::Field(FieldEditError::UnknownField(_)) => StatusCode::NOT_FOUND,
        ReviewError::Field(FieldEditError::KindMismatch { .. }) => StatusCode::BAD_REQUEST,
        ReviewError::NothingToApprove => StatusCode::BAD_REQUEST,
        ReviewError::ItemAlreadyApproved(_) | ReviewError::ApprovalInProgress => {
            StatusCode::CONFLICT
        }
        ReviewError::Extraction(_) | ReviewError::Save(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn parse_session_id(id: &str) -> Result<ReviewSessionId, (StatusCode, String)> {
    ReviewSessionId::parse(id)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Invalid review session ID".to_string()))
}

/// Open a session on step 1 with the sample text and default templates
pub async fn open_review(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReviewSessionDto>) {
    let session = state.review_service.open().await;
    (StatusCode::CREATED, Json(session.into()))
}

pub async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ReviewSessionDto>, (StatusCode, String)> {
    let id = parse_session_id(&id)?;
    state
        .review_service
        .get(id)
        .await
        .map(|session| Json(session.into()))
        .map_err(review_error)
}

pub async fn update_input(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateInputRequestDto>,
) -> Result<Json<ReviewSessionDto>, (StatusCode, String)> {
    let id = parse_session_id(&id)?;
    state
        .review_service
        .update_input(id, req.content, req.templates)
        .await
        .map(|session| Json(session.into()))
        .map_err(review_error)
}

/// Validate, lock and run the extraction; responds once items are ready
pub async fn extract_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ReviewSessionDto>, (StatusCode, String)> {
    let id = parse_session_id(&id)?;
    state
        .review_service
        .extract(id)
        .await
        .map(|session| Json(session.into()))
        .map_err(review_error)
}

pub async fn edit_field(
    State(state): State<Arc<AppState>>,
    Path((id, index, field)): Path<(String, usize, String)>,
    Json(req): Json<EditFieldRequestDto>,
) -> Result<Json<ReviewSessionDto>, (StatusCode, String)> {
    let id = parse_session_id(&id)?;
    state
        .review_service
        .edit_field(id, index, &field, req.value)
        .await
        .map_err(review_error)?;
    state
        .review_service
        .get(id)
        .await
        .map(|session| Json(session.into()))
        .map_err(review_error)
}

/// Save every unsaved item of the session for the current user
pub async fn approve_all(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<ApproveQueryDto>,
) -> Result<Json<ApprovalOutcome>, (StatusCode, String)> {
    let id = parse_session_id(&id)?;
    let options = SaveOptions {
        story_id: parse_story_id(query.story_id.as_deref())?,
    };
    state
        .review_service
        .approve_all(id, user_id, options)
        .await
        .map(Json)
        .map_err(review_error)
}

/// Download the session's items as `extracted_story_data.json`
pub async fn export_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let id = parse_session_id(&id)?;
    let items = state
        .review_service
        .export_items(id)
        .await
        .map_err(review_error)?;
    let json = JsonExporter::export(&items)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, JsonExporter::content_disposition()),
        ],
        json,
    ))
}

/// Back to step 1 with the sample text; discards items and any in-flight extraction
pub async fn reset_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ReviewSessionDto>, (StatusCode, String)> {
    let id = parse_session_id(&id)?;
    state
        .review_service
        .reset(id)
        .await
        .map(|session| Json(session.into()))
        .map_err(review_error)
}

pub async fn close_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let id = parse_session_id(&id)?;
    state
        .review_service
        .close(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(review_error)
}
