// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation for the auth endpoints.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::auth::{validate_password_strength, PasswordRequirements};
use crate::error::AppError;
use gym_common::{AuthRequest, ChangePasswordRequest};

const MAX_USERNAME_LENGTH: usize = 64;
const MAX_PASSWORD_LENGTH: usize = 128;

// Letters, digits, dot, dash and underscore; must start with a letter or digit.
// Generated gym usernames look like `First.Last` or `First.Last2`.
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("static regex"));

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username is mandatory")]
    MissingUsername,

    #[error("Password is mandatory")]
    MissingPassword,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a username's shape
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.trim().is_empty() {
        return Err(ValidationError::MissingUsername);
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !USERNAME_REGEX.is_match(username) || username.contains("..") {
        return Err(ValidationError::InvalidUsername(
            "may only contain letters, digits, '.', '-' and '_'".to_string(),
        ));
    }
    Ok(())
}

/// Validate a login request. Only presence is checked: a malformed username
/// simply fails authentication.
pub fn validate_login(req: &AuthRequest) -> ValidationResult<()> {
    if req.username.trim().is_empty() {
        return Err(ValidationError::MissingUsername);
    }
    if req.password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    if req.password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a change-password request against the strength requirements
pub fn validate_change_password(
    req: &ChangePasswordRequest,
    requirements: &PasswordRequirements,
) -> ValidationResult<()> {
    validate_username(&req.username)?;
    if req.old_password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Old password is mandatory".to_string(),
        ));
    }
    if req.new_password.trim().is_empty() {
        return Err(ValidationError::InvalidPassword(
            "New password is mandatory".to_string(),
        ));
    }
    if req.new_password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    if req.new_password == req.old_password {
        return Err(ValidationError::InvalidPassword(
            "new password must differ from the old one".to_string(),
        ));
    }
    if !validate_password_strength(&req.new_password, requirements) {
        return Err(ValidationError::InvalidPassword(format!(
            "must be at least {} characters and meet the complexity rules",
            requirements.min_length
        )));
    }
    Ok(())
}
