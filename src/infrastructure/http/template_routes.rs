//! Template catalog API routes

use axum::Json;

use crate::application::dto::TemplateDto;
use crate::domain::entities::catalog;

/// List the extraction templates with their empty JSON skeletons
pub async fn list_templates() -> Json<Vec<TemplateDto>> {
    Json(catalog().into_iter().map(TemplateDto::from).collect())
}
