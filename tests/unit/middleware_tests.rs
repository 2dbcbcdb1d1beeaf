// ==============================
// tests/unit/middleware_tests.rs
// ==============================
//! Request gate tests against a minimal router
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Extension, Router,
};
use gym_backend_lib::middleware::{authenticate, AuthenticatedUser};
use gym_backend_lib::storage::InMemoryUserStore;
use gym_backend_lib::AppState;

use crate::test_utils::{bare, seed_user, send, test_state, TEST_PASSWORD};

async fn whoami(request: Request) -> String {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(AuthenticatedUser(principal)) => principal.username.clone(),
        None => "anonymous".to_string(),
    }
}

async fn seeded_state() -> Arc<AppState<InMemoryUserStore>> {
    let state = test_state();
    seed_user(&state, "john.doe", TEST_PASSWORD).await;
    Arc::new(state)
}

fn gated(state: Arc<AppState<InMemoryUserStore>>, layers: usize) -> Router {
    let mut router = Router::new().route("/whoami", get(whoami));
    for _ in 0..layers {
        router = router.layer(from_fn_with_state(
            state.clone(),
            authenticate::<InMemoryUserStore>,
        ));
    }
    router
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_request_without_token_passes_through() {
    let state = seeded_state().await;
    let app = gated(state, 1);

    let response = send(&app, bare(Method::GET, "/whoami", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "anonymous");
}

#[tokio::test]
async fn test_valid_token_attaches_principal() {
    let state = seeded_state().await;
    let token = state.tokens.issue("john.doe").unwrap();
    let app = gated(state, 1);

    let response = send(&app, bare(Method::GET, "/whoami", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "john.doe");
}

#[tokio::test]
async fn test_gate_is_reentrant() {
    let state = seeded_state().await;
    let token = state.tokens.issue("john.doe").unwrap();
    let app = gated(state, 2);

    let response = send(&app, bare(Method::GET, "/whoami", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "john.doe");
}

#[tokio::test]
async fn test_revoked_token_is_rejected_before_handler() {
    let state = seeded_state().await;
    let token = state.tokens.issue("john.doe").unwrap();
    state.revocations.revoke(&token);
    let app = gated(state, 1);

    let response = send(&app, bare(Method::GET, "/whoami", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_extractor_rejects_anonymous_requests() {
    async fn protected(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.0.username
    }

    let state = seeded_state().await;
    let app = Router::new()
        .route("/protected", get(|user: AuthenticatedUser| async move { user.0.username }))
        .route("/extension", get(protected))
        .layer(from_fn_with_state(state.clone(), authenticate::<InMemoryUserStore>));

    let response = send(&app, bare(Method::GET, "/protected", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = state.tokens.issue("john.doe").unwrap();
    let response = send(&app, bare(Method::GET, "/extension", Some(&token))).await;
    assert_eq!(body_text(response).await, "john.doe");
}
