// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Login, logout and password change.
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use gym_common::{AuthRequest, AuthResponse, ChangePasswordRequest, PrincipalResponse};
use metrics::counter;
use tracing::info;
use zeroize::Zeroize;

use crate::auth::hash_password_secure;
use crate::error::AppError;
use crate::metrics::{AUTH_LOGIN_HIT, AUTH_PASSWORD_CHANGED, AUTH_TOKEN_ISSUED};
use crate::middleware::{bearer_token, AuthenticatedUser};
use crate::storage::UserStore;
use crate::validation;
use crate::AppState;

/// `POST /auth/login`
///
/// 200 with a fresh token, 401 for a locked account or bad credentials.
pub async fn login<S: UserStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    counter!(AUTH_LOGIN_HIT).increment(1);
    validation::validate_login(&req)?;

    let user = state.verifier.authenticate(&req.username, &req.password).await?;
    let token = state.tokens.issue(&user.username)?;

    counter!(AUTH_TOKEN_ISSUED).increment(1);
    info!(username = %user.username, "user logged in");

    Ok(Json(AuthResponse {
        token,
        username: user.username,
    }))
}

/// `POST /auth/logout`
///
/// Always 204. Revokes the presented bearer token, valid or not.
pub async fn logout<S: UserStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.revocations.revoke(token);
        info!("token revoked on logout");
    }
    StatusCode::NO_CONTENT
}

/// `PUT /auth/change-password`
///
/// The caller must be logged in as the account being changed. The old
/// password goes through the credential verifier, so failures here count
/// towards the lockout like failed logins.
pub async fn change_password<S: UserStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(mut req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    validation::validate_change_password(&req, &state.settings.password.requirements)?;

    if principal.username != req.username {
        return Err(AppError::Forbidden(format!(
            "{} may not change the password of {}",
            principal.username, req.username
        )));
    }

    state
        .verifier
        .authenticate(&req.username, &req.old_password)
        .await?;
    req.old_password.zeroize();

    let log_n = state.settings.password.hash_log_n;
    let mut new_password = std::mem::take(&mut req.new_password);
    let hash = tokio::task::spawn_blocking(move || hash_password_secure(&mut new_password, log_n))
        .await?
        .map_err(|e| AppError::Internal(e.to_string()))?;

    state.store.save_user(&req.username, &hash).await?;

    counter!(AUTH_PASSWORD_CHANGED).increment(1);
    info!(username = %req.username, "password changed");
    Ok(StatusCode::OK)
}

/// `GET /auth/me`
pub async fn me(AuthenticatedUser(principal): AuthenticatedUser) -> Json<PrincipalResponse> {
    Json(PrincipalResponse {
        username: principal.username,
        authorities: principal.authorities,
        issued_at: principal.claims.iat,
        expires_at: principal.claims.exp,
    })
}
