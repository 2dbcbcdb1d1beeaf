// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gym_common::ErrorResponse;
use thiserror::Error;

/// Authentication and token failures. Every variant maps to 401.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("account temporarily locked")]
    AccountLocked,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("malformed token")]
    Malformed,

    #[error("token expired")]
    Expired,

    #[error("token revoked")]
    Revoked,

    #[error("token subject does not match the expected identity")]
    IdentityMismatch,

    #[error("token subject no longer exists")]
    UserNotFound,

    #[error("authentication required")]
    MissingCredentials,
}

impl AuthError {
    /// Internal code, distinct per variant, for logs and metrics labels
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AccountLocked => "account_locked",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Malformed => "token_malformed",
            AuthError::Expired => "token_expired",
            AuthError::Revoked => "token_revoked",
            AuthError::IdentityMismatch => "token_identity_mismatch",
            AuthError::UserNotFound => "user_not_found",
            AuthError::MissingCredentials => "missing_credentials",
        }
    }

    /// Code exposed to clients. Lockout and bad credentials share one code so
    /// a prober cannot tell them apart by anything but the message.
    pub fn public_code(&self) -> &'static str {
        match self {
            AuthError::AccountLocked | AuthError::InvalidCredentials => "BAD_CREDENTIALS",
            AuthError::Malformed | AuthError::IdentityMismatch => "TOKEN_INVALID",
            AuthError::Expired => "TOKEN_EXPIRED",
            AuthError::Revoked => "TOKEN_REVOKED",
            AuthError::UserNotFound | AuthError::MissingCredentials => "UNAUTHORIZED",
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::AccountLocked => {
                "You have been temporarily locked due to too many failed login attempts."
            }
            AuthError::InvalidCredentials => "Invalid username or password.",
            AuthError::Malformed | AuthError::IdentityMismatch => "Invalid token",
            AuthError::Expired => "Token has expired",
            AuthError::Revoked => "Token has been revoked",
            AuthError::UserNotFound => "Authentication failed",
            AuthError::MissingCredentials => "Full authentication is required to access this resource",
        }
    }
}

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Auth(e) => e.public_code(),
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::InvalidInput(_) => "VALIDATION_FAILED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => "INTERNAL_ERROR",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Auth(e) => e.public_message().to_string(),
            AppError::Forbidden(_) => "Access denied".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NotFound(_) => "Resource not found".to_string(),
            AppError::Config(_) | AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                "An internal server error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        // Auth messages are already sanitized; everything else shows detail
        // only in debug builds.
        let message = match &self {
            AppError::Auth(_) | AppError::InvalidInput(_) => self.sanitized_message(),
            _ if cfg!(debug_assertions) => self.to_string(),
            _ => self.sanitized_message(),
        };

        let body = ErrorResponse {
            status: status.as_u16(),
            error: self.error_code().to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Internal(format!("token signing failed: {err}"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}
