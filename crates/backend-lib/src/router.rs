// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP routes.
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, auth};
use crate::middleware::authenticate;
use crate::storage::UserStore;
use crate::AppState;

/// Create the application router.
///
/// Login, logout and health are outside the request gate: login needs no
/// token, and logout must answer 204 even for a token that is already
/// revoked or expired.
pub fn create_router<S: UserStore + Clone + 'static>(state: Arc<AppState<S>>) -> Router {
    let protected: Router<Arc<AppState<S>>> = Router::new()
        .route("/auth/change-password", put(auth::change_password::<S>))
        .route("/auth/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<S>,
        ));

    Router::new()
        .route("/auth/login", post(auth::login::<S>))
        .route("/auth/logout", post(auth::logout::<S>))
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
