pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::advisory::handlers as advisory;
use crate::catalog::handlers as catalog;
use crate::errors::AppError;
use crate::extraction::handlers as extraction;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/status", get(advisory::handle_status))
        // Catalog
        .route("/api/v1/catalog", get(catalog::handle_list_catalog))
        .route("/api/v1/catalog/roles", get(catalog::handle_list_roles))
        .route(
            "/api/v1/catalog/situations",
            get(catalog::handle_list_situations),
        )
        .route("/api/v1/feedback", post(catalog::handle_feedback))
        // Recommendation
        .route("/api/v1/advise", post(advisory::handle_advise))
        .route("/api/v1/extract", post(extraction::handle_extract))
        .fallback(not_found)
        .with_state(state)
}
