// crates/backend-lib/src/handlers/mod.rs

//! HTTP handlers.

pub mod auth;

use axum::Json;
use gym_common::HealthResponse;

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
    })
}
