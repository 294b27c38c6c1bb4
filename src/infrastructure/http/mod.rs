//! HTTP REST API routes

mod auth;
mod extraction_routes;
mod review_routes;
mod saved_data_routes;
mod template_routes;
mod upload_routes;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::infrastructure::state::AppState;

pub use auth::{CurrentUser, USER_ID_HEADER};

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create all API routes
pub fn create_routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        // Template catalog
        .route("/api/templates", get(template_routes::list_templates))
        // Stateless extraction and save
        .route("/api/extract", post(extraction_routes::extract))
        .route("/api/save", post(extraction_routes::save_items))
        // Review sessions
        .route("/api/reviews", post(review_routes::open_review))
        .route("/api/reviews/{id}", get(review_routes::get_review))
        .route("/api/reviews/{id}", delete(review_routes::close_review))
        .route("/api/reviews/{id}/input", put(review_routes::update_input))
        .route("/api/reviews/{id}/extract", post(review_routes::extract_review))
        .route(
            "/api/reviews/{id}/items/{index}/fields/{field}",
            put(review_routes::edit_field),
        )
        .route("/api/reviews/{id}/approve", post(review_routes::approve_all))
        .route("/api/reviews/{id}/export", get(review_routes::export_review))
        .route("/api/reviews/{id}/reset", post(review_routes::reset_review))
        // Uploads
        .route(
            "/api/uploads",
            post(upload_routes::upload_file).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
            )),
        )
        .route("/api/uploads/{file_name}", delete(upload_routes::delete_file))
        // Saved data
        .route("/api/saved", get(saved_data_routes::get_saved_data))
        .route("/api/auth/status", get(saved_data_routes::auth_status))
}

/// The complete application: health check, API routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(create_routes(state.config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
