//! REST API for the dashboard pages.
//!
//! Each page is served as JSON built from the cached, filtered dataset.

pub mod handlers;
pub mod service;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use service::DashboardService;

pub fn create_router(service: Arc<DashboardService>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/filters", get(handlers::get_filters))
        .route("/api/v1/pages/:page", get(handlers::get_page))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
