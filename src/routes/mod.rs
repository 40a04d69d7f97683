use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{propagate_request_id, request_span};
use crate::store::LibraryStore;

pub mod collections;
pub mod stats;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LibraryStore>,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(propagate_request_id))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Collections
        .route("/collections", get(collections::list))
        .route("/collections/validate-rule", post(collections::validate_rule))
        .route("/collections/:id", get(collections::detail))
        .route("/collections/:id/sync", post(collections::sync))
        // Statistics
        .route("/stats", get(stats::overall))
        .route("/stats/best-movies", get(stats::best_movies))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
