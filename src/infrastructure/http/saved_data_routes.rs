//! Saved data viewer API routes

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::auth::CurrentUser;
use crate::application::dto::{AuthStatusDto, SavedDataDto};
use crate::application::services::SavedDataError;
use crate::infrastructure::state::AppState;

/// Recent characters, locations, stories and chapters of the current user
pub async fn get_saved_data(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<SavedDataDto>, (StatusCode, String)> {
    state
        .saved_data_service
        .load(user_id)
        .await
        .map(|data| Json(data.into()))
        .map_err(|e| match e {
            SavedDataError::NotAuthenticated => (StatusCode::UNAUTHORIZED, e.to_string()),
            SavedDataError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })
}

pub async fn auth_status(CurrentUser(user_id): CurrentUser) -> Json<AuthStatusDto> {
    Json(AuthStatusDto {
        authenticated: user_id.is_some(),
        user_id: user_id.map(|id| id.to_string()),
    })
}
