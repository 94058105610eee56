use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    services::providers::MovieCatalog,
};

pub mod analysis;
pub mod discover;
pub mod movies;
pub mod recommendations;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn MovieCatalog>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self { catalog }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/genres", get(movies::genres))
        .route("/movies/search", get(movies::search))
        .route("/movies/top", get(movies::top))
        .route("/movies/:id", get(movies::details))
        .route("/movies/:id/recommendations", get(recommendations::recommend))
        .route("/movies/:id/analysis", get(analysis::movie))
        .route("/discover", get(discover::discover))
        .route("/people/search", get(discover::people))
        .route("/keywords/search", get(discover::keywords))
        .route("/analysis/dashboard", get(analysis::dashboard))
        .route("/analysis/financials", get(analysis::financials))
}

async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Calendar date handlers use for "released by" and "last 30 days" bounds
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
