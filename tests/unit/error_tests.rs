// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::{http::StatusCode, response::IntoResponse};
use gym_backend_lib::error::{AppError, AuthError};
use gym_backend_lib::validation::ValidationError;
use gym_common::ErrorResponse;
use std::io::{Error as IoError, ErrorKind};

#[test]
fn test_app_error_display() {
    let auth_error = AppError::Auth(AuthError::Revoked);
    assert_eq!(auth_error.to_string(), "Authentication error: token revoked");

    let io_error = AppError::Io(IoError::new(ErrorKind::NotFound, "File not found"));
    assert!(io_error.to_string().contains("IO error"));
}

#[test]
fn test_token_errors_have_distinct_public_codes() {
    assert_eq!(AuthError::Malformed.public_code(), "TOKEN_INVALID");
    assert_eq!(AuthError::IdentityMismatch.public_code(), "TOKEN_INVALID");
    assert_eq!(AuthError::Expired.public_code(), "TOKEN_EXPIRED");
    assert_eq!(AuthError::Revoked.public_code(), "TOKEN_REVOKED");
}

#[test]
fn test_internal_codes_are_distinct() {
    let all = [
        AuthError::AccountLocked,
        AuthError::InvalidCredentials,
        AuthError::Malformed,
        AuthError::Expired,
        AuthError::Revoked,
        AuthError::IdentityMismatch,
        AuthError::UserNotFound,
        AuthError::MissingCredentials,
    ];
    let mut codes: Vec<_> = all.iter().map(AuthError::code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), all.len());
}

#[test]
fn test_validation_error_is_bad_request() {
    let err: AppError = ValidationError::MissingPassword.into();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.error_code(), "VALIDATION_FAILED");
    assert_eq!(err.sanitized_message(), "Password is mandatory");
}

#[test]
fn test_sanitized_messages_hide_details() {
    let err = AppError::Internal("db password is hunter2".to_string());
    assert_eq!(err.sanitized_message(), "An internal server error occurred");

    let err = AppError::Forbidden("john.doe may not change jane.doe".to_string());
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(err.sanitized_message(), "Access denied");
}

#[tokio::test]
async fn test_lockout_response_body() {
    let response = AppError::Auth(AuthError::AccountLocked).into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        ErrorResponse {
            status: 401,
            error: "BAD_CREDENTIALS".to_string(),
            message: "You have been temporarily locked due to too many failed login attempts."
                .to_string(),
        }
    );
}
