/*
 * Responsibility
 * - public health endpoints: GET /, GET /check/health, GET /generate_204
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Connectivity check used by clients behind captive portals.
pub async fn generate_204() -> StatusCode {
    StatusCode::NO_CONTENT
}
