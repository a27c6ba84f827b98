//! Router builder utilities for the relay routes

use crate::relay::handlers::{RelayState, save_invoice, upload_document};
use axum::extract::DefaultBodyLimit;
use axum::{Json, Router, routing::get, routing::post};
use serde_json::{Value, json};

/// Build the relay routes
///
/// - POST /api/upload - Forward a document to its extraction webhook
/// - POST /api/save - Forward an edited invoice to the storage webhook
pub fn build_relay_routes(state: RelayState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/api/upload", post(upload_document).layer(upload_limit))
        .route("/api/save", post(save_invoice))
        .with_state(state)
}

/// Build health check routes
pub fn build_health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-relay"
    }))
}
