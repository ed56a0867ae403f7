//! HTTP gateway (Axum) for OA search, PDF serving, and discovery metadata.
//!
//! This module is primarily used by the `oa-discovery` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{article_pdf_handler, manifest_handler, search_oa_handler};
pub use state::AppState;

pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/.well-known/mcp.json", get(manifest_handler))
        .route("/search_oa", post(search_oa_handler))
        .route("/article/{doi}/pdf", get(article_pdf_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}
