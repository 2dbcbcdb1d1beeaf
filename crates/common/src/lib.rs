// ================
// crates/common/src/lib.rs
// ================
//! Wire types shared between the gym backend and its HTTP clients.
//! Field names follow the JSON the public API has always spoken (camelCase).

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    /// Bearer token to send as `Authorization: Bearer <token>`
    pub token: String,
    pub username: String,
}

/// Body of `PUT /auth/change-password`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub username: String,
    pub old_password: String,
    pub new_password: String,
}

/// The authenticated caller, as returned by `GET /auth/me`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    pub username: String,
    pub authorities: Vec<String>,
    /// Seconds since the Unix epoch
    pub issued_at: i64,
    /// Seconds since the Unix epoch
    pub expires_at: i64,
}

/// Structured error body used for every failed request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Short machine-readable code
    pub error: String,
    /// Human-readable message
    pub message: String,
}

/// Liveness probe body
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
}
