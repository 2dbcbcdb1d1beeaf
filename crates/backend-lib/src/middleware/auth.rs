//! Request gate: authenticates a request from its bearer token.
//!
//! The gate only attaches identity. Whether a route needs one is decided by
//! the [`AuthenticatedUser`] extractor in the handler.
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use metrics::counter;
use tracing::{debug, info};

use crate::auth::Claims;
use crate::error::{AppError, AuthError};
use crate::metrics::AUTH_GATE_REJECTED;
use crate::storage::UserStore;
use crate::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub authorities: Vec<String>,
    pub claims: Claims,
}

/// Authenticated principal in the request extensions.
///
/// As an extractor it rejects with 401 when the gate attached nothing.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Auth(AuthError::MissingCredentials))
    }
}

/// Token from an `Authorization: Bearer <token>` header, if there is one
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication middleware function
///
/// 1. Skips requests that already carry a principal
/// 2. Passes requests without a bearer token through unauthenticated
/// 3. Rejects revoked tokens before parsing them
/// 4. Validates signature and expiry
/// 5. Loads the user's current authorities and attaches the principal
pub async fn authenticate<S: UserStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.extensions().get::<AuthenticatedUser>().is_some() {
        return Ok(next.run(request).await);
    }

    let Some(token) = bearer_token(request.headers()).map(str::to_owned) else {
        return Ok(next.run(request).await);
    };

    let principal = match resolve_principal(&state, &token).await {
        Ok(principal) => principal,
        Err(err) => {
            if let AppError::Auth(auth) = &err {
                counter!(AUTH_GATE_REJECTED, "code" => auth.code()).increment(1);
                info!(code = auth.code(), path = %request.uri().path(), "request rejected");
            }
            return Err(err);
        }
    };

    debug!(username = %principal.username, "request authenticated");
    request
        .extensions_mut()
        .insert(AuthenticatedUser(principal));

    Ok(next.run(request).await)
}

async fn resolve_principal<S: UserStore>(state: &AppState<S>, token: &str) -> Result<Principal, AppError> {
    if state.revocations.is_revoked(token) {
        return Err(AuthError::Revoked.into());
    }

    let claims = state.tokens.validate(token, None)?;

    let user = state
        .store
        .lookup_user(&claims.sub)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Principal {
        username: user.username,
        authorities: user.authorities,
        claims,
    })
}
