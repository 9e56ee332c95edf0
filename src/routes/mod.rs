use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

pub mod health;
pub mod metrics;
pub mod pages;
pub mod records;
pub mod reports;

/// Build the application routes. `/metrics` is mounted separately by the
/// server binary because the Prometheus recorder is process-global.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        // Pages
        .route("/", get(pages::record_form))
        .route("/records", post(records::create_record))
        .route("/report", get(pages::report))
        .route("/error", get(pages::error))
        .route("/scan", get(pages::scan))
        // API endpoints
        .route("/health", get(health::health_check))
        .route("/api/v1/reports", post(reports::generate_report))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        // Checked while the body is read; the multipart handler sees the overflow.
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
