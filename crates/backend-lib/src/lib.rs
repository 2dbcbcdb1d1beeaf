// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Authentication and session-security core of the gym backend.
//!
//! Credentials are checked once at login and exchanged for a signed bearer
//! token; every later request is authenticated from the token alone by the
//! request gate in [`middleware::auth`].

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use tracing::warn;

use crate::auth::{CredentialVerifier, LockoutGuard, RevocationRegistry, TokenIssuer};
use crate::config::Settings;
use crate::error::AppError;
use crate::storage::{FlatFileUserStore, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Settings the state was built from
    pub settings: Arc<Settings>,
    /// User store backend
    pub store: S,
    /// Username/password check, guarded by `lockout`
    pub verifier: CredentialVerifier<S>,
    /// Failed-login lockout
    pub lockout: LockoutGuard,
    /// Token signing and validation
    pub tokens: Arc<TokenIssuer>,
    /// Logged-out tokens
    pub revocations: RevocationRegistry,
}

impl<S: UserStore + Clone> AppState<S> {
    /// Create a new application state
    pub fn new(store: S, settings: &Settings) -> Result<Self, AppError> {
        settings.validate()?;

        let tokens = match &settings.jwt.secret {
            Some(secret) => TokenIssuer::new(secret.as_bytes(), settings.jwt.ttl()),
            None => {
                warn!("no jwt.secret configured; using a random secret, tokens will not survive a restart");
                TokenIssuer::with_random_secret(settings.jwt.ttl())
            }
        };

        let lockout = LockoutGuard::new(settings.lockout.max_attempts, settings.lockout.duration());
        let verifier = CredentialVerifier::new(
            store.clone(),
            lockout.clone(),
            settings.password.hash_log_n,
        )?;

        Ok(Self {
            settings: Arc::new(settings.clone()),
            store,
            verifier,
            lockout,
            tokens: Arc::new(tokens),
            revocations: RevocationRegistry::new(),
        })
    }
}

impl AppState<FlatFileUserStore> {
    /// Create application state backed by the flat-file store in
    /// `settings.data_dir`
    pub fn new_default(settings: &Settings) -> Result<Self, anyhow::Error> {
        let store = FlatFileUserStore::new(&settings.data_dir)?;
        Ok(Self::new(store, settings)?)
    }
}
